//! Handlers for `traders` subcommands.
//!
//! These edit the desired-state store. A running fleet applies the changes
//! on its next reload.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::llm::HttpChatTransport;
use crate::application::FleetService;
use crate::domain::{TraderId, TraderRecord};
use crate::error::{ConfigError, Error, RegistryError, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::admin::FleetAdmin;
use crate::port::outbound::store::DesiredStateSource;

#[derive(Tabled)]
struct TraderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Interval")]
    interval: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&TraderRecord> for TraderRow {
    fn from(record: &TraderRecord) -> Self {
        let exchange = if record.testnet {
            format!("{} (testnet)", record.exchange)
        } else {
            record.exchange.clone()
        };
        Self {
            id: record.trader_id.to_string(),
            name: record.name.clone(),
            model: record.ai_model.clone(),
            exchange,
            balance: record.initial_balance.to_string(),
            interval: format!("{}m", record.scan_interval_minutes),
            enabled: output::flag(record.enabled),
        }
    }
}

/// Summary of a record without any credential material.
fn record_json(record: &TraderRecord) -> serde_json::Value {
    json!({
        "trader_id": record.trader_id,
        "name": record.name,
        "ai_model": record.ai_model,
        "model_name": record.model_name,
        "exchange": record.exchange,
        "testnet": record.testnet,
        "initial_balance": record.initial_balance.to_string(),
        "scan_interval_minutes": record.scan_interval_minutes,
        "enabled": record.enabled,
    })
}

fn open_service(config: &Config) -> Result<FleetService> {
    let store = bootstrap::open_store(config)?;
    Ok(bootstrap::build_fleet(
        config,
        store,
        Arc::new(HttpChatTransport::new()),
    ))
}

/// List every stored trader record.
pub async fn execute_list(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = bootstrap::open_store(&config)?;
    let records = store.list_desired().await?;

    if output::is_json() {
        output::json_output(json!({
            "traders": records.iter().map(record_json).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if records.is_empty() {
        output::warning("No traders stored");
        output::hint("add one with `tradefleet traders upsert <file>`");
        return Ok(());
    }

    let rows: Vec<TraderRow> = records.iter().map(TraderRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

/// Read a record from a TOML or JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn read_record(path: &Path) -> Result<TraderRecord> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content).map_err(ConfigError::Parse)?)
    }
}

/// Validate a record file and store it.
pub async fn execute_upsert(config_path: &Path, file: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let record = read_record(file)?;
    let id = record.trader_id.clone();

    open_service(&config)?.upsert(record).await?;

    if output::is_json() {
        output::json_output(json!({ "stored": id }));
        return Ok(());
    }
    output::success(&format!("Stored trader {}", output::highlight(&id)));
    output::hint("reload the running fleet (SIGHUP) to apply");
    Ok(())
}

/// Delete a stored record.
///
/// # Errors
///
/// Returns [`RegistryError::NotFound`] if no record has this id.
pub async fn execute_remove(config_path: &Path, id: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let id = TraderId::new(id);

    if !open_service(&config)?.delete(&id).await? {
        return Err(Error::Registry(RegistryError::NotFound { id }));
    }

    if output::is_json() {
        output::json_output(json!({ "removed": id }));
        return Ok(());
    }
    output::success(&format!("Removed trader {}", output::highlight(&id)));
    output::hint("reload the running fleet (SIGHUP) to stop its worker");
    Ok(())
}
