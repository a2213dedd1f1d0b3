//! Reconciliation controller.
//!
//! Converges the live registry onto the desired-state snapshot by set
//! difference on trader ids:
//!
//! - `live - desired` is removed,
//! - `desired - live` is decoded, added and started,
//! - `live ∩ desired` gets its trading switch copied from the snapshot.
//!
//! A worker present on both sides keeps its original configuration even if
//! the stored record changed; only the switch is synced. Replacing a config
//! requires deleting the record, reloading, then re-adding it.
//!
//! Passes are serialized. Per-item failures are logged and collected in the
//! report; only a failed snapshot fetch aborts a pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::registry::FleetRegistry;
use crate::domain::{
    ReconcileAction, ReconcileFailure, ReconcileReport, TraderConfig, TraderId, TraderRecord,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::DesiredStateSource;

/// Drives the registry toward a desired-state source.
pub struct Reconciler {
    registry: Arc<FleetRegistry>,
    source: Arc<dyn DesiredStateSource>,
    in_flight: Mutex<()>,
}

impl Reconciler {
    #[must_use]
    pub fn new(registry: Arc<FleetRegistry>, source: Arc<dyn DesiredStateSource>) -> Self {
        Self {
            registry,
            source,
            in_flight: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<FleetRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn DesiredStateSource> {
        &self.source
    }

    /// Run one pass. Concurrent callers queue behind the pass in flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotFetch`] if the desired state cannot be read.
    /// The registry is untouched in that case.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let _pass = self.in_flight.lock().await;

        let records = self.source.list_desired().await.map_err(|e| {
            warn!(source = self.source.name(), error = %e, "Desired state fetch failed, pass aborted");
            Error::SnapshotFetch(Box::new(e))
        })?;

        let desired: HashMap<&TraderId, &TraderRecord> =
            records.iter().map(|r| (&r.trader_id, r)).collect();
        let live: Vec<TraderId> = self.registry.ids();
        let live_set: HashSet<&TraderId> = live.iter().collect();

        debug!(
            desired = desired.len(),
            live = live.len(),
            "Reconciliation pass started"
        );

        let mut report = ReconcileReport::default();

        let stale: Vec<&TraderId> = live.iter().filter(|id| !desired.contains_key(id)).collect();
        self.remove_stale(&stale, &mut report).await;

        for record in records
            .iter()
            .filter(|r| !live_set.contains(&r.trader_id))
        {
            match self.add_and_start(record) {
                Ok(()) => {
                    report.added += 1;
                    info!(trader_id = %record.trader_id, "Trader added");
                }
                Err(e) => fail(&mut report, &record.trader_id, ReconcileAction::Add, &e),
            }
        }

        for id in live.iter().filter(|id| desired.contains_key(id)) {
            let enabled = desired[id].enabled;
            match self.registry.set_enabled(id, enabled) {
                Ok(()) => {
                    report.synced += 1;
                    debug!(trader_id = %id, enabled, "Trading switch synced");
                }
                Err(e) => fail(&mut report, id, ReconcileAction::Sync, &e),
            }
        }

        info!(
            added = report.added,
            removed = report.removed,
            synced = report.synced,
            failed = report.failures.len(),
            "Reconciliation complete"
        );
        Ok(report)
    }

    async fn remove_stale(&self, stale: &[&TraderId], report: &mut ReconcileReport) {
        let results = join_all(stale.iter().map(|id| self.registry.remove(id))).await;
        for (id, result) in stale.iter().zip(results) {
            match result {
                Ok(()) => {
                    report.removed += 1;
                    info!(trader_id = %id, "Trader removed");
                }
                Err(e) => fail(report, id, ReconcileAction::Remove, &e),
            }
        }
    }

    fn add_and_start(&self, record: &TraderRecord) -> Result<()> {
        let config = TraderConfig::try_from(record)?;
        self.registry.add(config)?;
        self.registry.start(&record.trader_id)
    }
}

fn fail(report: &mut ReconcileReport, id: &TraderId, action: ReconcileAction, error: &Error) {
    warn!(trader_id = %id, action = %action, error = %error, "Reconciliation item failed");
    report.failures.push(ReconcileFailure {
        id: id.clone(),
        action,
        reason: error.to_string(),
    });
}
