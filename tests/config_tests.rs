use std::fs;

use tradefleet::error::{ConfigError, Error};
use tradefleet::infrastructure::config::settings::Config;
use tradefleet::testkit::config::config_toml;

#[test]
fn loads_config_file_with_seed_traders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let toml = format!(
        r#"{}
[[traders]]
trader_id = "alpha"
name = "Alpha"
ai_model = "qwen"
model_api_key = "sk-q"
exchange = "hyperliquid"
hyperliquid_private_key = "0xabc"
initial_balance = "250.5"

[[traders]]
trader_id = "beta"
name = "Beta"
ai_model = "custom"
model_api_key = "sk-c"
exchange = "binance"
initial_balance = "100"
enabled = false
"#,
        config_toml("fleet.db")
    );
    fs::write(&path, toml).unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.llm.max_attempts, 3);
    assert_eq!(config.fleet.stop_timeout_secs, 2);
    assert_eq!(config.traders.len(), 2);
    assert_eq!(config.traders[0].scan_interval_minutes, 3);
    assert!(!config.traders[1].enabled);

    // beta is custom without base url/model and binance without keys.
    let errors = config.seed_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("beta"));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn rejects_zero_attempts() {
    let toml = config_toml("fleet.db").replace("max_attempts = 3", "max_attempts = 0");
    let err = Config::parse_toml(&toml).unwrap_err();
    assert!(err.to_string().contains("max_attempts"), "{err}");
}

#[test]
fn rejects_unknown_log_format() {
    let toml = config_toml("fleet.db").replace("format = \"pretty\"", "format = \"xml\"");
    let err = Config::parse_toml(&toml).unwrap_err();
    assert!(err.to_string().contains("format"), "{err}");
}

#[test]
fn rejects_duplicate_seed_ids() {
    let seed = r#"
[[traders]]
trader_id = "a"
name = "A"
ai_model = "deepseek"
exchange = "binance"
initial_balance = "1"
"#;
    let toml = format!("{}{seed}{seed}", config_toml("fleet.db"));
    let err = Config::parse_toml(&toml).unwrap_err();
    assert!(err.to_string().contains("duplicate trader_id 'a'"), "{err}");
}

#[test]
fn database_override_ignores_blank_values() {
    let mut config = Config::parse_toml(&config_toml("fleet.db")).unwrap();

    config.apply_database_override(Some("   ".into()));
    assert_eq!(config.database, "fleet.db");

    config.apply_database_override(Some("/tmp/other.db".into()));
    assert_eq!(config.database, "/tmp/other.db");
}
