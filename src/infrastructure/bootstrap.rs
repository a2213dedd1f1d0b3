//! Composition root: wires the store, transport, registry and controller.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::llm::HttpChatTransport;
use crate::adapter::outbound::sqlite::SqliteTraderStore;
use crate::application::advisory::AdvisoryCycleFactory;
use crate::application::invocation::InvocationClient;
use crate::application::reconcile::Reconciler;
use crate::application::registry::FleetRegistry;
use crate::application::FleetService;
use crate::domain::TraderRecord;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::ChatTransport;
use crate::port::outbound::store::DesiredStateSource;

/// Open the configured SQLite store and run migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub fn open_store(config: &Config) -> Result<Arc<SqliteTraderStore>> {
    let store = SqliteTraderStore::open(&config.database)?;
    info!(database = %config.database, "Desired-state store opened");
    Ok(Arc::new(store))
}

/// Copy `seeds` into `store` if the store holds no records yet.
///
/// Returns how many records were written.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub async fn seed_store(store: &dyn DesiredStateSource, seeds: &[TraderRecord]) -> Result<usize> {
    if seeds.is_empty() || !store.list_desired().await?.is_empty() {
        return Ok(0);
    }
    for record in seeds {
        store.upsert(record).await?;
    }
    info!(count = seeds.len(), "Store seeded from config");
    Ok(seeds.len())
}

/// Build the fleet service over `source` and `transport`.
#[must_use]
pub fn build_fleet(
    config: &Config,
    source: Arc<dyn DesiredStateSource>,
    transport: Arc<dyn ChatTransport>,
) -> FleetService {
    let client = InvocationClient::new(transport, config.llm.retry_policy());
    let factory = AdvisoryCycleFactory::new(client, config.llm.timeout());
    let registry = Arc::new(FleetRegistry::new(
        Arc::new(factory),
        config.fleet.stop_timeout(),
    ));
    FleetService::new(Reconciler::new(registry, source))
}

/// Full production wiring: SQLite store, seeding, HTTP transport.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or seeded.
pub async fn bootstrap(config: &Config) -> Result<FleetService> {
    let store = open_store(config)?;
    seed_store(store.as_ref(), &config.traders).await?;
    Ok(build_fleet(
        config,
        store,
        Arc::new(HttpChatTransport::new()),
    ))
}
