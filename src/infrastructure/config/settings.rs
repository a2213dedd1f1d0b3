//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the database path can be
//! overridden with the `TRADEFLEET_DATABASE` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use tradefleet::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use super::fleet::FleetConfig;
use super::llm::LlmConfig;
use super::logging::{LoggingConfig, LOG_FORMATS};
use crate::domain::{TraderConfig, TraderRecord};
use crate::error::{ConfigError, RegistryError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "TRADEFLEET_DATABASE";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Model invocation client settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Worker lifecycle settings.
    #[serde(default)]
    pub fleet: FleetConfig,

    /// Path to the SQLite desired-state database.
    ///
    /// Defaults to "tradefleet.db" in the current directory. `:memory:` keeps
    /// the store in memory for the life of the process.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Records that seed an empty desired-state store at startup.
    #[serde(default)]
    pub traders: Vec<TraderRecord>,
}

fn default_database_path() -> String {
    "tradefleet.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        config.apply_database_override(std::env::var(DATABASE_ENV).ok());
        Ok(config)
    }

    /// Replace the database path when `value` is set and non-empty.
    pub fn apply_database_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|v| !v.trim().is_empty()) {
            self.database = path;
        }
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Decode every seed record, returning the failures.
    ///
    /// Bad seeds do not fail config loading; reconciliation reports them per
    /// item. This is for `config validate`.
    #[must_use]
    pub fn seed_errors(&self) -> Vec<RegistryError> {
        self.traders
            .iter()
            .filter_map(|record| TraderConfig::try_from(record).err())
            .collect()
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of: {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.llm.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.fleet.stop_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stop_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        let mut seen = HashSet::new();
        for record in &self.traders {
            if record.scan_interval_minutes == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "scan_interval_minutes",
                    reason: format!("trader '{}': must be greater than 0", record.trader_id),
                }
                .into());
            }
            if !seen.insert(&record.trader_id) {
                return Err(ConfigError::InvalidValue {
                    field: "traders",
                    reason: format!("duplicate trader_id '{}'", record.trader_id),
                }
                .into());
            }
        }

        Ok(())
    }
}
