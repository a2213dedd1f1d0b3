//! Handlers for `config` subcommands.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Show the effective configuration with defaults applied.
///
/// Seed credentials are never printed.
pub fn execute_show(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    if output::is_json() {
        output::json_output(json!({
            "database": config.database,
            "logging": { "level": config.logging.level, "format": config.logging.format },
            "llm": {
                "timeout_secs": config.llm.timeout_secs,
                "max_attempts": config.llm.max_attempts,
                "backoff_unit_ms": config.llm.backoff_unit_ms,
            },
            "fleet": { "stop_timeout_secs": config.fleet.stop_timeout_secs },
            "traders": config.traders.iter().map(|t| t.trader_id.as_str()).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Configuration");
    output::field("Config", config_path.display());
    output::field("Database", &config.database);
    output::field("Log level", &config.logging.level);
    output::field("Log format", &config.logging.format);

    output::section("Invocation");
    output::field("Timeout", format!("{}s", config.llm.timeout_secs));
    output::field("Attempts", config.llm.max_attempts);
    output::field("Backoff unit", format!("{}ms", config.llm.backoff_unit_ms));

    output::section("Fleet");
    output::field("Stop timeout", format!("{}s", config.fleet.stop_timeout_secs));
    output::field("Seeds", config.traders.len());
    for record in &config.traders {
        output::field("", output::highlight(&record.trader_id));
    }
    Ok(())
}

/// Validate the configuration file.
///
/// Structural errors fail the command. Seed records that would not decode
/// are reported as warnings, since reconciliation skips them individually.
pub fn execute_validate(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let seed_errors = config.seed_errors();

    for err in &seed_errors {
        output::warning(&err.to_string());
    }

    if seed_errors.is_empty() {
        output::success(&format!("{} is valid", config_path.display()));
    } else {
        output::success(&format!(
            "{} is valid ({} seed trader(s) will be skipped)",
            config_path.display(),
            seed_errors.len()
        ));
    }
    Ok(())
}
