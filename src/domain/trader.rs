//! Trader configuration: the raw desired-state record and its validated form.
//!
//! A [`TraderRecord`] is what the desired-state store holds: flat, serde
//! friendly, and possibly incomplete. Decoding it into a [`TraderConfig`]
//! applies provider defaults and rejects missing credentials. The resulting
//! config is immutable for the lifetime of the worker built from it.

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use super::id::TraderId;
use super::provider::{InvocationConfig, ModelProvider};
use crate::error::RegistryError;

/// Scan interval applied when a record does not specify one.
pub const DEFAULT_SCAN_INTERVAL_MINUTES: u32 = 3;

const fn default_scan_interval_minutes() -> u32 {
    DEFAULT_SCAN_INTERVAL_MINUTES
}

const fn default_enabled() -> bool {
    true
}

/// A trader as stored in the desired-state source.
///
/// Provider and exchange are kept as free text so one malformed record only
/// fails its own decoding rather than the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderRecord {
    pub trader_id: TraderId,
    pub name: String,
    /// Model provider name (`deepseek`, `qwen`, `custom`).
    pub ai_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_secret_key: Option<String>,
    /// Overrides the provider's default endpoint. Required for `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_base_url: Option<String>,
    /// Overrides the provider's default model. Required for `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Exchange name (`binance`, `hyperliquid`, `aster`).
    pub exchange: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binance_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binance_secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperliquid_private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aster_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aster_signer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aster_private_key: Option<String>,
    #[serde(default)]
    pub testnet: bool,
    pub initial_balance: Decimal,
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Exchange account credentials, one shape per supported venue.
#[derive(Clone, PartialEq, Eq)]
pub enum ExchangeCredentials {
    Binance {
        api_key: String,
        secret_key: String,
        testnet: bool,
    },
    Hyperliquid {
        private_key: String,
        testnet: bool,
    },
    Aster {
        user: String,
        signer: String,
        private_key: String,
    },
}

impl ExchangeCredentials {
    /// Stable lowercase exchange name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Binance { .. } => "binance",
            Self::Hyperliquid { .. } => "hyperliquid",
            Self::Aster { .. } => "aster",
        }
    }

    fn blank_field(&self) -> Option<&'static str> {
        let fields: Vec<(&'static str, &str)> = match self {
            Self::Binance {
                api_key,
                secret_key,
                ..
            } => vec![
                ("binance_api_key", api_key.as_str()),
                ("binance_secret_key", secret_key.as_str()),
            ],
            Self::Hyperliquid { private_key, .. } => {
                vec![("hyperliquid_private_key", private_key.as_str())]
            }
            Self::Aster {
                user,
                signer,
                private_key,
            } => vec![
                ("aster_user", user.as_str()),
                ("aster_signer", signer.as_str()),
                ("aster_private_key", private_key.as_str()),
            ],
        };
        fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

impl fmt::Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Model endpoint and credentials for one trader.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub provider: ModelProvider,
    pub api_key: String,
    pub secret_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Validated, immutable configuration of one trader.
#[derive(Debug, Clone, PartialEq)]
pub struct TraderConfig {
    pub id: TraderId,
    pub name: String,
    pub model: ModelSettings,
    pub exchange: ExchangeCredentials,
    pub initial_balance: Decimal,
    pub scan_interval: Duration,
    /// Trading switch as loaded. The live switch lives on the worker handle.
    pub enabled: bool,
}

impl TraderConfig {
    /// Check that every required field is present and well formed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidConfig {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_blank() {
            return Err(invalid("trader_id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if self.model.api_key.trim().is_empty() {
            return Err(invalid("model_api_key must not be empty".into()));
        }
        if self.model.model.trim().is_empty() {
            return Err(invalid("model_name must not be empty".into()));
        }
        match Url::parse(&self.model.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(invalid(format!(
                    "model_base_url scheme '{}' is not http(s)",
                    url.scheme()
                )))
            }
            Err(e) => return Err(invalid(format!("model_base_url: {e}"))),
        }
        if let Some(field) = self.exchange.blank_field() {
            return Err(invalid(format!("{field} must not be empty")));
        }
        if self.initial_balance <= Decimal::ZERO {
            return Err(invalid("initial_balance must be greater than 0".into()));
        }
        if self.scan_interval.is_zero() {
            return Err(invalid("scan_interval_minutes must be greater than 0".into()));
        }
        Ok(())
    }

    /// Per-call invocation settings for this trader's model.
    #[must_use]
    pub fn invocation_config(&self, timeout: Duration) -> InvocationConfig {
        InvocationConfig {
            provider: self.model.provider,
            api_key: self.model.api_key.clone(),
            secret_key: self.model.secret_key.clone(),
            base_url: self.model.base_url.clone(),
            model: self.model.model.clone(),
            timeout,
        }
    }
}

impl TryFrom<&TraderRecord> for TraderConfig {
    type Error = RegistryError;

    fn try_from(record: &TraderRecord) -> Result<Self, Self::Error> {
        let id = record.trader_id.clone();
        let invalid = |reason: String| RegistryError::InvalidConfig {
            id: id.clone(),
            reason,
        };
        let required = |value: &Option<String>, field: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| invalid(format!("missing {field}")))
        };

        let provider: ModelProvider = record.ai_model.parse().map_err(invalid)?;
        let api_key = required(&record.model_api_key, "model_api_key")?;
        let base_url = match (&record.model_base_url, provider.default_base_url()) {
            (Some(url), _) if !url.trim().is_empty() => url.trim().to_string(),
            (_, Some(default)) => default.to_string(),
            _ => return Err(invalid(format!("{provider} provider requires model_base_url"))),
        };
        let model = match (&record.model_name, provider.default_model()) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(default)) => default.to_string(),
            _ => return Err(invalid(format!("{provider} provider requires model_name"))),
        };

        let exchange = match record.exchange.trim().to_ascii_lowercase().as_str() {
            "binance" => ExchangeCredentials::Binance {
                api_key: required(&record.binance_api_key, "binance_api_key")?,
                secret_key: required(&record.binance_secret_key, "binance_secret_key")?,
                testnet: record.testnet,
            },
            "hyperliquid" => ExchangeCredentials::Hyperliquid {
                private_key: required(&record.hyperliquid_private_key, "hyperliquid_private_key")?,
                testnet: record.testnet,
            },
            "aster" => ExchangeCredentials::Aster {
                user: required(&record.aster_user, "aster_user")?,
                signer: required(&record.aster_signer, "aster_signer")?,
                private_key: required(&record.aster_private_key, "aster_private_key")?,
            },
            other => return Err(invalid(format!("unsupported exchange '{other}'"))),
        };

        let config = Self {
            id: record.trader_id.clone(),
            name: record.name.trim().to_string(),
            model: ModelSettings {
                provider,
                api_key,
                secret_key: record
                    .model_secret_key
                    .clone()
                    .filter(|k| !k.trim().is_empty()),
                base_url,
                model,
            },
            exchange,
            initial_balance: record.initial_balance,
            scan_interval: Duration::from_secs(u64::from(record.scan_interval_minutes) * 60),
            enabled: record.enabled,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> TraderRecord {
        TraderRecord {
            trader_id: TraderId::new("ds"),
            name: "DeepSeek Trader".into(),
            ai_model: "deepseek".into(),
            model_api_key: Some("sk-test".into()),
            model_secret_key: None,
            model_base_url: None,
            model_name: None,
            exchange: "binance".into(),
            binance_api_key: Some("bk".into()),
            binance_secret_key: Some("binance-secret-xyz".into()),
            hyperliquid_private_key: None,
            aster_user: None,
            aster_signer: None,
            aster_private_key: None,
            testnet: true,
            initial_balance: dec!(1000),
            scan_interval_minutes: 3,
            enabled: true,
        }
    }

    fn reason(err: RegistryError) -> String {
        match err {
            RegistryError::InvalidConfig { reason, .. } => reason,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn decodes_with_provider_defaults() {
        let config = TraderConfig::try_from(&record()).unwrap();
        assert_eq!(config.model.provider, ModelProvider::DeepSeek);
        assert_eq!(config.model.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.model.model, "deepseek-chat");
        assert_eq!(config.scan_interval, Duration::from_secs(180));
        assert_eq!(config.exchange.kind(), "binance");
    }

    #[test]
    fn explicit_model_overrides_defaults() {
        let mut r = record();
        r.model_name = Some("deepseek-reasoner".into());
        let config = TraderConfig::try_from(&r).unwrap();
        assert_eq!(config.model.model, "deepseek-reasoner");
    }

    #[test]
    fn custom_provider_requires_url_and_model() {
        let mut r = record();
        r.ai_model = "custom".into();
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("model_base_url"));

        r.model_base_url = Some("https://llm.internal/v1".into());
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("model_name"));

        r.model_name = Some("local-70b".into());
        let config = TraderConfig::try_from(&r).unwrap();
        assert_eq!(config.model.base_url, "https://llm.internal/v1");
    }

    #[test]
    fn malformed_base_url_is_invalid_config() {
        let mut r = record();
        r.model_base_url = Some("not a url".into());
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).starts_with("model_base_url"));

        r.model_base_url = Some("ftp://llm.internal/v1".into());
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("not http(s)"));
    }

    #[test]
    fn missing_credentials_are_invalid() {
        let mut r = record();
        r.model_api_key = Some("   ".into());
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("model_api_key"));

        let mut r = record();
        r.binance_secret_key = None;
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("binance_secret_key"));

        let mut r = record();
        r.exchange = "aster".into();
        r.aster_user = Some("0xuser".into());
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("aster_signer"));
    }

    #[test]
    fn unknown_provider_and_exchange_are_invalid() {
        let mut r = record();
        r.ai_model = "gpt".into();
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("gpt"));

        let mut r = record();
        r.exchange = "kraken".into();
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("kraken"));
    }

    #[test]
    fn zero_interval_and_balance_are_invalid() {
        let mut r = record();
        r.scan_interval_minutes = 0;
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("scan_interval"));

        let mut r = record();
        r.initial_balance = Decimal::ZERO;
        assert!(reason(TraderConfig::try_from(&r).unwrap_err()).contains("initial_balance"));
    }

    #[test]
    fn record_defaults_when_deserialized() {
        let r: TraderRecord = serde_json::from_str(
            r#"{
                "trader_id": "hl",
                "name": "HL",
                "ai_model": "qwen",
                "model_api_key": "k",
                "exchange": "hyperliquid",
                "hyperliquid_private_key": "0xabc",
                "initial_balance": 500
            }"#,
        )
        .unwrap();
        assert_eq!(r.scan_interval_minutes, DEFAULT_SCAN_INTERVAL_MINUTES);
        assert!(r.enabled);
        assert!(!r.testnet);
        let config = TraderConfig::try_from(&r).unwrap();
        assert_eq!(config.exchange.kind(), "hyperliquid");
    }

    #[test]
    fn invocation_config_carries_model_settings() {
        let config = TraderConfig::try_from(&record()).unwrap();
        let inv = config.invocation_config(Duration::from_secs(120));
        assert_eq!(inv.api_key, "sk-test");
        assert_eq!(inv.model, "deepseek-chat");
        assert_eq!(inv.timeout, Duration::from_secs(120));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = TraderConfig::try_from(&record()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-test"));
        assert!(!rendered.contains("binance-secret-xyz"));
    }
}
