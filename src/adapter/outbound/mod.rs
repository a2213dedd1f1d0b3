//! Outbound adapters (driven side).

pub mod llm;
pub mod memory;
pub mod sqlite;
