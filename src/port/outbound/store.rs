//! Desired-state source port.
//!
//! The store holds the authoritative list of traders an operator wants
//! running. The reconciliation controller only ever reads it; upserts and
//! deletes come from the administrative surface before a reload.

use async_trait::async_trait;

use crate::domain::{TraderId, TraderRecord};
use crate::error::Result;

/// Authoritative trader configuration list.
#[async_trait]
pub trait DesiredStateSource: Send + Sync {
    /// Return the store name for logging.
    fn name(&self) -> &'static str;

    /// Fetch every desired trader record.
    ///
    /// The returned list is treated as one atomic snapshot: an error means no
    /// part of it may be acted on.
    async fn list_desired(&self) -> Result<Vec<TraderRecord>>;

    /// Insert or replace the record with the same `trader_id`.
    async fn upsert(&self, record: &TraderRecord) -> Result<()>;

    /// Delete a record. Returns whether a record was removed.
    async fn delete(&self, id: &TraderId) -> Result<bool>;
}
