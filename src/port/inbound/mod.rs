//! Inbound (driving) ports consumed by inbound adapters.
//!
//! Inbound ports expose application capabilities to external drivers such as
//! the command-line interface and the runtime signal handlers.
//!
//! # Modules
//!
//! - [`admin`]: Fleet reload, listing and trading-switch controls

pub mod admin;
