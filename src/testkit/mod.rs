//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`llm`]: `ScriptedTransport`, a [`ChatTransport`](crate::port::ChatTransport)
//!   with pre-loaded outcomes and attempt counting.
//! - [`cycle`]: `CountingCycle` and `CountingFactory` for registry tests.
//! - [`store`]: `ControlledSource`, a desired-state source that can fail or stall.
//! - [`domain`]: Builders for trader records and configs.
//! - [`config`]: Canonical test configurations.

pub mod config;
pub mod cycle;
pub mod domain;
pub mod llm;
pub mod store;
