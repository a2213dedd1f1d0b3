use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tradefleet::testkit::config::config_toml;

fn write_config(dir: &TempDir, extra: &str) -> PathBuf {
    let database = dir.path().join("fleet.db");
    let path = dir.path().join("config.toml");
    let contents = format!("{}{extra}", config_toml(&database.to_string_lossy()));
    fs::write(&path, contents).expect("write config");
    path
}

fn tradefleet(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tradefleet").expect("binary built");
    cmd.env_remove("TRADEFLEET_DATABASE").arg("--config").arg(config);
    cmd
}

const RECORD: &str = r#"
trader_id = "alpha"
name = "Alpha"
ai_model = "deepseek"
model_api_key = "sk-secret-alpha"
exchange = "binance"
binance_api_key = "bk"
binance_secret_key = "bs-secret-alpha"
initial_balance = "1000"
scan_interval_minutes = 5
"#;

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "");

    tradefleet(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn config_validate_fails_on_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "");
    let broken = fs::read_to_string(&config)
        .unwrap()
        .replace("stop_timeout_secs = 2", "stop_timeout_secs = 0");
    fs::write(&config, broken).unwrap();

    tradefleet(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stop_timeout_secs"));
}

#[test]
fn config_validate_warns_about_bad_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let seed = r#"
[[traders]]
trader_id = "nokey"
name = "No key"
ai_model = "deepseek"
exchange = "binance"
initial_balance = "1"
"#;
    let config = write_config(&dir, seed);

    tradefleet(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nokey"))
        .stdout(predicate::str::contains("will be skipped"));
}

#[test]
fn traders_upsert_then_list_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "");
    let record = dir.path().join("alpha.toml");
    fs::write(&record, RECORD).unwrap();

    tradefleet(&config)
        .args(["traders", "upsert"])
        .arg(&record)
        .assert()
        .success();

    let output = tradefleet(&config)
        .args(["--json", "traders", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let traders = value["traders"].as_array().unwrap();
    assert_eq!(traders.len(), 1);
    assert_eq!(traders[0]["trader_id"], "alpha");
    assert_eq!(traders[0]["scan_interval_minutes"], 5);
    assert!(!stdout.contains("sk-secret-alpha"));
    assert!(!stdout.contains("bs-secret-alpha"));
}

#[test]
fn traders_upsert_rejects_incomplete_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "");
    let record = dir.path().join("alpha.toml");
    fs::write(&record, RECORD.replace("binance_secret_key", "unused_key")).unwrap();

    tradefleet(&config)
        .args(["traders", "upsert"])
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("binance_secret_key"));

    tradefleet(&config)
        .args(["--json", "traders", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"traders\":[]"));
}

#[test]
fn traders_remove_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "");

    tradefleet(&config)
        .args(["traders", "remove", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}
