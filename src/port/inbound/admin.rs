//! Administrative control port.
//!
//! Exposes fleet operations to control surfaces (CLI, signal handlers, an
//! HTTP layer) without coupling them to the registry or controller types.

use async_trait::async_trait;

use crate::domain::{ReconcileReport, TraderId, TraderRecord, WorkerSnapshot};
use crate::error::Result;

/// Operator-facing fleet controls.
#[async_trait]
pub trait FleetAdmin: Send + Sync {
    /// Converge the live fleet to the desired-state store.
    async fn reload(&self) -> Result<ReconcileReport>;

    /// Snapshot of every registered worker, sorted by id.
    fn list(&self) -> Vec<WorkerSnapshot>;

    /// Live trading switch of one worker.
    fn get_enabled(&self, id: &TraderId) -> Result<bool>;

    /// Flip the live trading switch of one worker.
    fn set_enabled(&self, id: &TraderId, enabled: bool) -> Result<()>;

    /// Write a record to the desired-state store. Takes effect on the next reload.
    async fn upsert(&self, record: TraderRecord) -> Result<()>;

    /// Delete a record from the desired-state store. Takes effect on the next reload.
    async fn delete(&self, id: &TraderId) -> Result<bool>;
}
