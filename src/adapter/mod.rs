//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Command-line interface driving the fleet
//! - [`outbound`] - Desired-state stores and the model HTTP transport

pub mod inbound;
pub mod outbound;
