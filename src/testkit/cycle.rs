//! Mock worker cycles.
//!
//! [`CountingFactory`] hands every trader its own [`CountingCycle`] and keeps
//! them so tests can inspect per-trader activity and the config each worker
//! was built with.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{TraderConfig, TraderId};
use crate::error::{Error, Result};
use crate::port::outbound::cycle::{CycleContext, CycleFactory, TradingCycle};

/// Cycle that only counts its runs.
#[derive(Debug, Default)]
pub struct CountingCycle {
    runs: AtomicU64,
    enabled_runs: AtomicU64,
}

impl CountingCycle {
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Runs that saw the trading switch on.
    pub fn enabled_runs(&self) -> u64 {
        self.enabled_runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradingCycle for CountingCycle {
    async fn run_cycle(&self, ctx: &CycleContext) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if ctx.trading_enabled {
            self.enabled_runs.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Factory producing [`CountingCycle`]s, optionally refusing some traders.
#[derive(Default)]
pub struct CountingFactory {
    built: Mutex<HashMap<TraderId, (Arc<TraderConfig>, Arc<CountingCycle>)>>,
    refuse: Mutex<Vec<TraderId>>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `build` fail for `id`.
    pub fn refuse(&self, id: &str) {
        self.refuse.lock().push(TraderId::new(id));
    }

    /// Most recent cycle built for `id`.
    pub fn cycle(&self, id: &str) -> Option<Arc<CountingCycle>> {
        self.built
            .lock()
            .get(&TraderId::new(id))
            .map(|(_, cycle)| Arc::clone(cycle))
    }

    /// Config the most recent cycle for `id` was built with.
    pub fn config(&self, id: &str) -> Option<Arc<TraderConfig>> {
        self.built
            .lock()
            .get(&TraderId::new(id))
            .map(|(config, _)| Arc::clone(config))
    }
}

impl CycleFactory for CountingFactory {
    fn build(&self, config: Arc<TraderConfig>) -> Result<Arc<dyn TradingCycle>> {
        if self.refuse.lock().contains(&config.id) {
            return Err(Error::Connection(format!(
                "exchange unavailable for trader '{}'",
                config.id
            )));
        }
        let cycle = Arc::new(CountingCycle::default());
        self.built
            .lock()
            .insert(config.id.clone(), (config, Arc::clone(&cycle)));
        Ok(cycle)
    }
}
