//! Fleet administration service.
//!
//! Implements [`FleetAdmin`] over the registry, the reconciler and the
//! desired-state store. This is what control surfaces hold.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::reconcile::Reconciler;
use crate::application::registry::FleetRegistry;
use crate::domain::{ReconcileReport, TraderConfig, TraderId, TraderRecord, WorkerSnapshot};
use crate::error::Result;
use crate::port::inbound::admin::FleetAdmin;

pub struct FleetService {
    reconciler: Reconciler,
}

impl FleetService {
    #[must_use]
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<FleetRegistry> {
        self.reconciler.registry()
    }

    /// Stop every worker. Used on shutdown.
    pub async fn shutdown(&self) {
        info!(workers = self.registry().len(), "Stopping fleet");
        self.registry().stop_all().await;
    }
}

#[async_trait]
impl FleetAdmin for FleetService {
    async fn reload(&self) -> Result<ReconcileReport> {
        self.reconciler.reconcile().await
    }

    fn list(&self) -> Vec<WorkerSnapshot> {
        self.registry().list()
    }

    fn get_enabled(&self, id: &TraderId) -> Result<bool> {
        self.registry().is_enabled(id)
    }

    fn set_enabled(&self, id: &TraderId, enabled: bool) -> Result<()> {
        self.registry().set_enabled(id, enabled)?;
        info!(trader_id = %id, enabled, "Trading switch updated");
        Ok(())
    }

    async fn upsert(&self, record: TraderRecord) -> Result<()> {
        // Reject records the next reload could never start.
        TraderConfig::try_from(&record)?;
        self.reconciler.source().upsert(&record).await?;
        info!(trader_id = %record.trader_id, "Trader record stored");
        Ok(())
    }

    async fn delete(&self, id: &TraderId) -> Result<bool> {
        let deleted = self.reconciler.source().delete(id).await?;
        info!(trader_id = %id, deleted, "Trader record deleted");
        Ok(deleted)
    }
}
