//! Outcome of one reconciliation pass.

use std::fmt;

use serde::Serialize;

use super::id::TraderId;

/// Which step of a pass an item failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    Add,
    Remove,
    Sync,
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Sync => "sync",
        })
    }
}

/// A per-item failure that did not stop the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileFailure {
    pub id: TraderId,
    pub action: ReconcileAction,
    pub reason: String,
}

/// Aggregate counts of a pass. Only successful items are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub added: usize,
    pub removed: usize,
    pub synced: usize,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    /// True when the pass changed nothing but flags.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {}, removed {}, synced {}",
            self.added, self.removed, self.synced
        )?;
        if !self.failures.is_empty() {
            write!(f, ", {} failed", self.failures.len())?;
        }
        Ok(())
    }
}
