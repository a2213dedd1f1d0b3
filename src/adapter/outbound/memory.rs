//! In-memory desired-state store.
//!
//! Backs tests and embedders that do not want a database file.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{TraderId, TraderRecord};
use crate::error::Result;
use crate::port::outbound::store::DesiredStateSource;

/// In-memory store, listing ordered by trader id.
#[derive(Debug, Default)]
pub struct InMemoryTraderStore {
    records: RwLock<BTreeMap<TraderId, TraderRecord>>,
}

impl InMemoryTraderStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`. Later duplicates replace earlier ones.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = TraderRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.trader_id.clone(), r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DesiredStateSource for InMemoryTraderStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_desired(&self) -> Result<Vec<TraderRecord>> {
        Ok(self.records.read().values().cloned().collect())
    }

    async fn upsert(&self, record: &TraderRecord) -> Result<()> {
        self.records
            .write()
            .insert(record.trader_id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &TraderId) -> Result<bool> {
        Ok(self.records.write().remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::record;

    #[tokio::test]
    async fn upsert_replaces_and_lists_in_id_order() {
        let store = InMemoryTraderStore::with_records([record("b"), record("a")]);

        let mut changed = record("a");
        changed.enabled = false;
        store.upsert(&changed).await.unwrap();

        let listed = store.list_desired().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], changed);
        assert_eq!(listed[1].trader_id.as_str(), "b");
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = InMemoryTraderStore::with_records([record("a")]);
        assert!(store.delete(&TraderId::new("a")).await.unwrap());
        assert!(!store.delete(&TraderId::new("a")).await.unwrap());
        assert!(store.is_empty());
    }
}
