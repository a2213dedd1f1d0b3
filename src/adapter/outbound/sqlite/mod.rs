//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed desired-state store using Diesel ORM.

pub mod database;
pub mod store;

pub use store::SqliteTraderStore;
