//! Tradefleet - fleet controller for model-driven trading workers.
//!
//! Keeps a set of long-running trader workers in line with a persisted
//! desired state, and gives them a retrying client for OpenAI-compatible
//! chat completion APIs.
//!
//! # Architecture
//!
//! - **`application::registry`** - `FleetRegistry`, the authoritative map of
//!   live workers with start/stop/enable control
//! - **`application::reconcile`** - `Reconciler`, which diffs the desired
//!   state against the registry and applies adds, removes and enable syncs
//! - **`application::invocation`** - `InvocationClient`, bounded retries with
//!   linear backoff over a `ChatTransport`
//!
//! # Modules
//!
//! - [`adapter`] - CLI, SQLite and in-memory stores, HTTP transport
//! - [`application`] - Registry, reconciliation, invocation and the fleet service
//! - [`domain`] - Trader records, validated configs, worker snapshots
//! - [`error`] - Error types for the crate
//! - [`infrastructure`] - Configuration, wiring and the process loop
//! - [`port`] - Trait seams between the layers
//!
//! # Example
//!
//! ```no_run
//! use tradefleet::infrastructure::config::settings::Config;
//! use tradefleet::infrastructure::{bootstrap, runtime};
//!
//! # async fn run() -> tradefleet::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let service = bootstrap::bootstrap(&config).await?;
//! runtime::start(&service).await?;
//! runtime::run_until(&service, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
