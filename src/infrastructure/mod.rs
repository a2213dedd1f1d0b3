//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic. This layer handles configuration, wiring, and the
//! long-running process loop.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`runtime`] - Startup pass, reload signal handling and shutdown

pub mod bootstrap;
pub mod config;
pub mod runtime;
