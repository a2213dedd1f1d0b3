//! Desired-state sources for reconciliation tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::outbound::memory::InMemoryTraderStore;
use crate::domain::{TraderId, TraderRecord};
use crate::error::{Error, Result};
use crate::port::outbound::store::DesiredStateSource;

/// In-memory source with a failure switch, a fetch counter and an optional
/// fetch delay for overlapping-pass tests.
#[derive(Default)]
pub struct ControlledSource {
    inner: InMemoryTraderStore,
    failing: AtomicBool,
    fetches: AtomicU32,
    delay: parking_lot::Mutex<Option<Duration>>,
}

impl ControlledSource {
    pub fn new(records: Vec<TraderRecord>) -> Self {
        Self {
            inner: InMemoryTraderStore::with_records(records),
            ..Self::default()
        }
    }

    /// Make every following `list_desired` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Sleep this long inside every `list_desired`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DesiredStateSource for ControlledSource {
    fn name(&self) -> &'static str {
        "controlled"
    }

    async fn list_desired(&self) -> Result<Vec<TraderRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Database("database is locked".into()));
        }
        self.inner.list_desired().await
    }

    async fn upsert(&self, record: &TraderRecord) -> Result<()> {
        self.inner.upsert(record).await
    }

    async fn delete(&self, id: &TraderId) -> Result<bool> {
        self.inner.delete(id).await
    }
}
