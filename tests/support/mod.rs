//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tradefleet::application::reconcile::Reconciler;
use tradefleet::application::registry::FleetRegistry;
use tradefleet::domain::{TraderId, TraderRecord};
use tradefleet::testkit::cycle::CountingFactory;
use tradefleet::testkit::store::ControlledSource;

/// Registry, factory and source wired into a reconciler.
pub struct Fleet {
    pub factory: Arc<CountingFactory>,
    pub registry: Arc<FleetRegistry>,
    pub source: Arc<ControlledSource>,
    pub reconciler: Reconciler,
}

impl Fleet {
    pub fn new(records: Vec<TraderRecord>) -> Self {
        let factory = Arc::new(CountingFactory::new());
        let registry = Arc::new(FleetRegistry::new(factory.clone(), Duration::from_secs(2)));
        let source = Arc::new(ControlledSource::new(records));
        let reconciler = Reconciler::new(registry.clone(), source.clone());
        Self {
            factory,
            registry,
            source,
            reconciler,
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.registry
            .ids()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    pub fn enabled(&self, id: &str) -> bool {
        self.registry
            .is_enabled(&TraderId::new(id))
            .unwrap_or_else(|e| panic!("{e}"))
    }
}
