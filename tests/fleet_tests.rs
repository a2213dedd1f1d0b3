use std::sync::Arc;
use std::time::Duration;

use tradefleet::adapter::outbound::memory::InMemoryTraderStore;
use tradefleet::domain::TraderId;
use tradefleet::error::{Error, RegistryError};
use tradefleet::infrastructure::bootstrap::build_fleet;
use tradefleet::infrastructure::config::settings::Config;
use tradefleet::port::inbound::admin::FleetAdmin;
use tradefleet::testkit::config::config_toml;
use tradefleet::testkit::domain::{broken_record, record, record_with};
use tradefleet::testkit::llm::ScriptedTransport;

fn config() -> Config {
    Config::parse_toml(&config_toml(":memory:")).unwrap()
}

#[tokio::test(start_paused = true)]
async fn disabled_traders_do_not_call_the_model() {
    let store = Arc::new(InMemoryTraderStore::with_records(vec![
        record("a"),
        record_with("b", false),
    ]));
    let transport = Arc::new(ScriptedTransport::replying("BTCUSDT HOLD flat market"));
    let fleet = build_fleet(&config(), store, transport.clone());

    let report = fleet.reload().await.unwrap();
    assert_eq!(report.added, 2);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.attempts(), 1);

    let workers = fleet.list();
    assert_eq!(
        workers[0].last_output.as_deref(),
        Some("BTCUSDT HOLD flat market")
    );
    assert_eq!(workers[1].last_output, None);

    fleet.set_enabled(&TraderId::new("b"), true).unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.attempts(), 3);

    fleet.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn prompts_name_the_trader_and_exchange() {
    let store = Arc::new(InMemoryTraderStore::with_records(vec![record("a")]));
    let transport = Arc::new(ScriptedTransport::replying("HOLD"));
    let fleet = build_fleet(&config(), store, transport.clone());

    fleet.reload().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.model, "deepseek-chat");
    assert_eq!(request.messages.len(), 2);
    assert!(request.messages[0].content.contains("Trader a"));
    assert!(request.messages[0].content.contains("binance"));
    assert!(request.messages[1].content.contains("Cycle #1"));

    fleet.shutdown().await;
}

#[tokio::test]
async fn upsert_rejects_records_that_cannot_start() {
    let store = Arc::new(InMemoryTraderStore::new());
    let fleet = build_fleet(
        &config(),
        store.clone(),
        Arc::new(ScriptedTransport::replying("HOLD")),
    );

    let err = fleet.upsert(broken_record("a")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Registry(RegistryError::InvalidConfig { .. })
    ));
    assert!(store.is_empty());

    fleet.upsert(record("a")).await.unwrap();
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn store_edits_apply_on_reload() {
    let store = Arc::new(InMemoryTraderStore::new());
    let fleet = build_fleet(
        &config(),
        store,
        Arc::new(ScriptedTransport::replying("HOLD")),
    );
    let id = TraderId::new("a");

    fleet.upsert(record("a")).await.unwrap();
    assert!(fleet.list().is_empty());

    fleet.reload().await.unwrap();
    assert_eq!(fleet.list().len(), 1);
    assert!(fleet.get_enabled(&id).unwrap());

    assert!(fleet.delete(&id).await.unwrap());
    assert!(!fleet.delete(&id).await.unwrap());
    let report = fleet.reload().await.unwrap();
    assert_eq!(report.removed, 1);
    assert!(fleet.list().is_empty());
    assert!(matches!(
        fleet.get_enabled(&id).unwrap_err(),
        Error::Registry(RegistryError::NotFound { .. })
    ));
}
