//! Fleet domain types: identifiers, trader configuration and model providers.

pub mod id;
pub mod provider;
pub mod reconcile;
pub mod trader;
pub mod worker;

pub use id::TraderId;
pub use provider::{InvocationConfig, ModelProvider};
pub use reconcile::{ReconcileAction, ReconcileFailure, ReconcileReport};
pub use trader::{
    ExchangeCredentials, ModelSettings, TraderConfig, TraderRecord, DEFAULT_SCAN_INTERVAL_MINUTES,
};
pub use worker::{WorkerSnapshot, WorkerState};
