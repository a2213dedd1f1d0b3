//! Worker task loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::TraderId;
use crate::port::outbound::cycle::{CycleContext, TradingCycle};

/// Cycle outcome counters shared between a worker task and its handle.
#[derive(Debug, Default)]
pub(super) struct WorkerStats {
    pub(super) completed: AtomicU64,
    pub(super) failed: AtomicU64,
    pub(super) last_cycle_at: Mutex<Option<DateTime<Utc>>>,
}

impl WorkerStats {
    fn record(&self, ok: bool) {
        if ok {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        *self.last_cycle_at.lock() = Some(Utc::now());
    }
}

/// Everything a worker task owns.
pub(super) struct WorkerTask {
    pub(super) id: TraderId,
    pub(super) cycle: Arc<dyn TradingCycle>,
    pub(super) interval: Duration,
    pub(super) enabled: Arc<AtomicBool>,
    pub(super) stats: Arc<WorkerStats>,
    pub(super) cancel: CancellationToken,
}

impl WorkerTask {
    /// Run cycles on a fixed interval until cancelled.
    ///
    /// The first cycle starts immediately. Cancellation is checked before
    /// every cycle; a cycle already in progress is never interrupted here.
    pub(super) async fn run(self) {
        info!(
            trader_id = %self.id,
            interval_secs = self.interval.as_secs(),
            "Worker started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            cycle += 1;
            let ctx = CycleContext {
                trader_id: self.id.clone(),
                cycle,
                trading_enabled: self.enabled.load(Ordering::Acquire),
            };

            match self.cycle.run_cycle(&ctx).await {
                Ok(()) => {
                    self.stats.record(true);
                    debug!(trader_id = %self.id, cycle, "Cycle completed");
                }
                Err(e) => {
                    self.stats.record(false);
                    warn!(trader_id = %self.id, cycle, error = %e, "Cycle failed");
                }
            }
        }

        info!(trader_id = %self.id, cycles = cycle, "Worker stopped");
    }
}
