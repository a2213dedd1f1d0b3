//! Registry-owned handle for one worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::worker::{WorkerStats, WorkerTask};
use crate::domain::{TraderConfig, TraderId, WorkerSnapshot, WorkerState};
use crate::port::outbound::cycle::TradingCycle;

/// A spawned worker task and the token that stops it.
pub(super) struct RunningTask {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Live state of one registered worker.
///
/// The config is fixed at registration. Only the trading switch changes
/// after that.
pub(super) struct WorkerHandle {
    id: TraderId,
    config: Arc<TraderConfig>,
    cycle: Arc<dyn TradingCycle>,
    enabled: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    state: Mutex<WorkerState>,
    task: Mutex<Option<RunningTask>>,
}

impl WorkerHandle {
    pub(super) fn new(config: Arc<TraderConfig>, cycle: Arc<dyn TradingCycle>) -> Self {
        Self {
            id: config.id.clone(),
            enabled: Arc::new(AtomicBool::new(config.enabled)),
            config,
            cycle,
            stats: Arc::new(WorkerStats::default()),
            state: Mutex::new(WorkerState::Created),
            task: Mutex::new(None),
        }
    }

    pub(super) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub(super) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(super) fn state(&self) -> WorkerState {
        *self.state.lock()
    }

    pub(super) fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            id: self.id.clone(),
            config: Arc::clone(&self.config),
            state: self.state(),
            trading_enabled: self.is_enabled(),
            cycles_completed: self.stats.completed.load(Ordering::Relaxed),
            cycles_failed: self.stats.failed.load(Ordering::Relaxed),
            last_cycle_at: *self.stats.last_cycle_at.lock(),
            last_output: self.cycle.last_output(),
        }
    }

    /// Spawn the worker task. Returns `false` if it is already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub(super) fn start(&self) -> bool {
        let mut task = self.task.lock();
        if task.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let worker = WorkerTask {
            id: self.id.clone(),
            cycle: Arc::clone(&self.cycle),
            interval: self.config.scan_interval,
            enabled: Arc::clone(&self.enabled),
            stats: Arc::clone(&self.stats),
            cancel: cancel.clone(),
        };
        let join = tokio::spawn(worker.run());
        *task = Some(RunningTask { cancel, join });
        *self.state.lock() = WorkerState::Running;
        true
    }

    /// Signal the task to stop and hand back its join handle.
    ///
    /// Does not wait. Pair with [`await_stop`](Self::await_stop).
    pub(super) fn signal_stop(&self) -> Option<JoinHandle<()>> {
        let running = self.task.lock().take()?;
        running.cancel.cancel();
        *self.state.lock() = WorkerState::Stopped;
        Some(running.join)
    }

    /// Wait for a signalled task, aborting it once `timeout` elapses.
    pub(super) async fn await_stop(&self, join: JoinHandle<()>, timeout: Duration) {
        let abort = join.abort_handle();
        match tokio::time::timeout(timeout, join).await {
            Ok(Ok(())) => debug!(trader_id = %self.id, "Worker task joined"),
            Ok(Err(e)) if e.is_panic() => {
                error!(trader_id = %self.id, error = %e, "Worker task panicked");
            }
            Ok(Err(e)) => debug!(trader_id = %self.id, error = %e, "Worker task cancelled"),
            Err(_) => {
                warn!(
                    trader_id = %self.id,
                    timeout_secs = timeout.as_secs(),
                    "Worker did not stop in time, aborting"
                );
                abort.abort();
            }
        }
    }

    /// Signal and wait. No-op for a worker that never started.
    pub(super) async fn stop(&self, timeout: Duration) {
        if let Some(join) = self.signal_stop() {
            self.await_stop(join, timeout).await;
        }
    }
}
