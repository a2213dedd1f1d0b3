//! Fleet registry: the set of live workers keyed by trader id.
//!
//! The registry map is the only shared mutable structure in the fleet. It is
//! guarded by a single read/write lock held only for map operations; task
//! spawning, joining and cycle construction happen outside it.
//!
//! Callers never see a worker handle. [`FleetRegistry::get`] and
//! [`FleetRegistry::list`] hand out detached [`WorkerSnapshot`] copies.

mod handle;
mod worker;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, info};

use handle::WorkerHandle;

use crate::domain::{TraderConfig, TraderId, WorkerSnapshot};
use crate::error::{RegistryError, Result};
use crate::port::outbound::cycle::CycleFactory;

/// Default bound on waiting for a worker task to acknowledge a stop.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Concurrent map of registered workers.
pub struct FleetRegistry {
    workers: RwLock<HashMap<TraderId, Arc<WorkerHandle>>>,
    factory: Arc<dyn CycleFactory>,
    stop_timeout: Duration,
}

impl FleetRegistry {
    #[must_use]
    pub fn new(factory: Arc<dyn CycleFactory>, stop_timeout: Duration) -> Self {
        Self {
            workers: RwLock::new(HashMap::new()),
            factory,
            stop_timeout,
        }
    }

    /// Register a worker for `config`. The worker is not started.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidConfig`] if the config fails validation.
    /// - [`RegistryError::DuplicateIdentifier`] if the id is already
    ///   registered. The existing worker is left untouched.
    /// - Any error from the cycle factory.
    pub fn add(&self, config: TraderConfig) -> Result<()> {
        config.validate()?;
        let id = config.id.clone();
        if self.workers.read().contains_key(&id) {
            return Err(RegistryError::DuplicateIdentifier { id }.into());
        }

        let config = Arc::new(config);
        let cycle = self.factory.build(Arc::clone(&config))?;
        let handle = Arc::new(WorkerHandle::new(config, cycle));

        // Re-check under the write lock: another add may have won the race.
        match self.workers.write().entry(id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateIdentifier { id }.into()),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                debug!(trader_id = %id, "Worker registered");
                Ok(())
            }
        }
    }

    /// Snapshot of one worker.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown id.
    pub fn get(&self, id: &TraderId) -> Result<WorkerSnapshot> {
        Ok(self.handle(id)?.snapshot())
    }

    /// Snapshots of every worker, sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<WorkerSnapshot> {
        let mut snapshots: Vec<_> = self
            .workers
            .read()
            .values()
            .map(|handle| handle.snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<TraderId> {
        let mut ids: Vec<_> = self.workers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn contains(&self, id: &TraderId) -> bool {
        self.workers.read().contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.read().is_empty()
    }

    /// Stop a worker and forget it.
    ///
    /// The id is free for re-registration as soon as this returns, and the
    /// old task has either acknowledged the stop or been aborted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown id.
    pub async fn remove(&self, id: &TraderId) -> Result<()> {
        let (handle, join) = {
            let mut workers = self.workers.write();
            let handle = workers
                .remove(id)
                .ok_or_else(|| RegistryError::NotFound { id: id.clone() })?;
            let join = handle.signal_stop();
            (handle, join)
        };

        if let Some(join) = join {
            handle.await_stop(join, self.stop_timeout).await;
        }
        info!(trader_id = %id, "Worker removed");
        Ok(())
    }

    /// Flip a worker's live trading switch. Takes effect at its next cycle.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown id.
    pub fn set_enabled(&self, id: &TraderId, enabled: bool) -> Result<()> {
        self.handle(id)?.set_enabled(enabled);
        Ok(())
    }

    /// Current live trading switch of a worker.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown id.
    pub fn is_enabled(&self, id: &TraderId) -> Result<bool> {
        Ok(self.handle(id)?.is_enabled())
    }

    /// Spawn a worker's task. Starting a running worker is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown id.
    pub fn start(&self, id: &TraderId) -> Result<()> {
        if self.handle(id)?.start() {
            info!(trader_id = %id, "Worker running");
        }
        Ok(())
    }

    /// Start every worker not already running. Returns how many were started.
    pub fn start_all(&self) -> usize {
        let handles: Vec<_> = self.workers.read().values().cloned().collect();
        let started = handles.iter().filter(|handle| handle.start()).count();
        info!(started, total = handles.len(), "Started workers");
        started
    }

    /// Stop every worker and wait for all of them.
    ///
    /// Handles stay registered in the stopped state.
    pub async fn stop_all(&self) {
        let handles: Vec<_> = self.workers.read().values().cloned().collect();
        let count = handles.len();
        join_all(handles.iter().map(|handle| handle.stop(self.stop_timeout))).await;
        info!(count, "All workers stopped");
    }

    fn handle(&self, id: &TraderId) -> std::result::Result<Arc<WorkerHandle>, RegistryError> {
        self.workers
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{ExchangeCredentials, ModelProvider, ModelSettings, WorkerState};
    use crate::error::Error;
    use crate::port::outbound::cycle::{CycleContext, TradingCycle};

    #[derive(Default)]
    struct Counting {
        runs: AtomicU64,
        enabled_runs: AtomicU64,
    }

    #[async_trait]
    impl TradingCycle for Counting {
        async fn run_cycle(&self, ctx: &CycleContext) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if ctx.trading_enabled {
                self.enabled_runs.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    struct Factory(Arc<Counting>);

    impl CycleFactory for Factory {
        fn build(&self, _config: Arc<TraderConfig>) -> Result<Arc<dyn TradingCycle>> {
            Ok(self.0.clone())
        }
    }

    fn config(id: &str) -> TraderConfig {
        TraderConfig {
            id: TraderId::new(id),
            name: format!("trader {id}"),
            model: ModelSettings {
                provider: ModelProvider::DeepSeek,
                api_key: "sk-test".into(),
                secret_key: None,
                base_url: "https://api.deepseek.com/v1".into(),
                model: "deepseek-chat".into(),
            },
            exchange: ExchangeCredentials::Hyperliquid {
                private_key: "0xabc".into(),
                testnet: true,
            },
            initial_balance: dec!(100),
            scan_interval: Duration::from_secs(60),
            enabled: true,
        }
    }

    fn registry() -> (FleetRegistry, Arc<Counting>) {
        let cycle = Arc::new(Counting::default());
        let registry = FleetRegistry::new(
            Arc::new(Factory(cycle.clone())),
            Duration::from_secs(1),
        );
        (registry, cycle)
    }

    #[test]
    fn duplicate_add_keeps_existing_worker() {
        let (registry, _) = registry();
        registry.add(config("a")).unwrap();
        registry.set_enabled(&TraderId::new("a"), false).unwrap();

        let mut other = config("a");
        other.name = "replacement".into();
        let err = registry.add(other).unwrap_err();

        assert!(matches!(
            err,
            Error::Registry(RegistryError::DuplicateIdentifier { .. })
        ));
        let snapshot = registry.get(&TraderId::new("a")).unwrap();
        assert_eq!(snapshot.config.name, "trader a");
        assert!(!snapshot.trading_enabled);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let (registry, _) = registry();
        let mut bad = config("a");
        bad.scan_interval = Duration::ZERO;
        let err = registry.add(bad).unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::InvalidConfig { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (registry, _) = registry();
        let id = TraderId::new("ghost");
        assert!(matches!(
            registry.get(&id),
            Err(Error::Registry(RegistryError::NotFound { .. }))
        ));
        assert!(registry.set_enabled(&id, true).is_err());
        assert!(registry.is_enabled(&id).is_err());
        assert!(registry.start(&id).is_err());
    }

    #[test]
    fn list_is_sorted_and_detached() {
        let (registry, _) = registry();
        registry.add(config("b")).unwrap();
        registry.add(config("a")).unwrap();

        let before = registry.list();
        registry.set_enabled(&TraderId::new("a"), false).unwrap();

        let ids: Vec<_> = before.iter().map(|s| s.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(before[0].trading_enabled);
        assert_eq!(before[0].state, WorkerState::Created);
    }

    #[tokio::test(start_paused = true)]
    async fn started_worker_runs_and_stops() {
        let (registry, cycle) = registry();
        registry.add(config("a")).unwrap();
        registry.start(&TraderId::new("a")).unwrap();

        tokio::time::sleep(Duration::from_secs(125)).await;
        // Immediate first cycle, then one per minute.
        assert_eq!(cycle.runs.load(Ordering::SeqCst), 3);

        registry.stop_all().await;
        let snapshot = registry.get(&TraderId::new("a")).unwrap();
        assert_eq!(snapshot.state, WorkerState::Stopped);
        assert_eq!(snapshot.cycles_completed, 3);
        assert_eq!(snapshot.last_output, None);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(cycle.runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn trading_switch_is_read_each_cycle() {
        let (registry, cycle) = registry();
        let id = TraderId::new("a");
        registry.add(config("a")).unwrap();
        registry.start(&id).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        registry.set_enabled(&id, false).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(cycle.runs.load(Ordering::SeqCst), 2);
        assert_eq!(cycle.enabled_runs.load(Ordering::SeqCst), 1);
        registry.stop_all().await;
    }

    #[tokio::test]
    async fn removed_id_can_be_added_again() {
        let (registry, _) = registry();
        let id = TraderId::new("a");
        registry.add(config("a")).unwrap();
        registry.start(&id).unwrap();

        registry.remove(&id).await.unwrap();
        assert!(matches!(
            registry.get(&id),
            Err(Error::Registry(RegistryError::NotFound { .. }))
        ));
        assert!(registry.remove(&id).await.is_err());

        registry.add(config("a")).unwrap();
        assert!(registry.contains(&id));
    }
}
