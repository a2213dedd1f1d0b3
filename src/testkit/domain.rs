//! Builders for domain values used across tests.
//!
//! Records built here always decode into a valid [`TraderConfig`] unless a
//! test breaks them on purpose.

use std::time::Duration;

use rust_decimal_macros::dec;

use crate::domain::{TraderConfig, TraderId, TraderRecord};

/// A valid DeepSeek/Binance testnet record with id `id`, enabled.
pub fn record(id: &str) -> TraderRecord {
    TraderRecord {
        trader_id: TraderId::new(id),
        name: format!("Trader {id}"),
        ai_model: "deepseek".into(),
        model_api_key: Some(format!("sk-{id}")),
        model_secret_key: None,
        model_base_url: None,
        model_name: None,
        exchange: "binance".into(),
        binance_api_key: Some(format!("bk-{id}")),
        binance_secret_key: Some(format!("bs-{id}")),
        hyperliquid_private_key: None,
        aster_user: None,
        aster_signer: None,
        aster_private_key: None,
        testnet: true,
        initial_balance: dec!(1000),
        scan_interval_minutes: 1,
        enabled: true,
    }
}

/// [`record`] with the trading switch set to `enabled`.
pub fn record_with(id: &str, enabled: bool) -> TraderRecord {
    TraderRecord {
        enabled,
        ..record(id)
    }
}

/// A record that fails decoding: Binance without a secret key.
pub fn broken_record(id: &str) -> TraderRecord {
    TraderRecord {
        binance_secret_key: None,
        ..record(id)
    }
}

/// Decoded [`record`] with the scan interval overridden.
pub fn config(id: &str, scan_interval: Duration) -> TraderConfig {
    let mut config = TraderConfig::try_from(&record(id)).unwrap_or_else(|e| panic!("{e}"));
    config.scan_interval = scan_interval;
    config
}

/// Generate ids `t0`, `t1`, ..., `t{n-1}`.
pub fn ids(n: usize) -> Vec<TraderId> {
    (0..n).map(|i| TraderId::new(format!("t{i}"))).collect()
}
