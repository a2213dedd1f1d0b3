//! Worker lifecycle state and point-in-time views.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::TraderId;
use super::trader::TraderConfig;

/// Lifecycle state of a registered worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Registered, task not spawned yet.
    Created,
    /// Task spawned and cycling.
    Running,
    /// Stop signalled. The task exits at its next cycle boundary, or is
    /// aborted once the stop timeout elapses.
    Stopped,
}

impl WorkerState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copy of a worker's observable state.
///
/// Snapshots are detached from the registry: later registry mutations do not
/// change a snapshot already handed out.
#[derive(Debug, Clone)]
pub struct WorkerSnapshot {
    pub id: TraderId,
    pub config: Arc<TraderConfig>,
    pub state: WorkerState,
    pub trading_enabled: bool,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
    /// Latest output reported by the worker's cycle (the model decision for
    /// advisory cycles).
    pub last_output: Option<String>,
}

impl WorkerSnapshot {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == WorkerState::Running
    }
}
