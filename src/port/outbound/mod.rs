//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the desired-state
//! store, model provider transports, and the per-worker trading cycle.

pub mod cycle;
pub mod llm;
pub mod store;
