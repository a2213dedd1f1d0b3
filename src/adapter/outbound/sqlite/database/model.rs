//! Database model types for Diesel ORM.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::traders;
use crate::domain::{TraderId, TraderRecord};
use crate::error::{Error, Result};

/// Database row for a trader.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = traders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TraderRow {
    pub trader_id: String,
    pub name: String,
    pub ai_model: String,
    pub model_api_key: Option<String>,
    pub model_secret_key: Option<String>,
    pub model_base_url: Option<String>,
    pub model_name: Option<String>,
    pub exchange: String,
    pub binance_api_key: Option<String>,
    pub binance_secret_key: Option<String>,
    pub hyperliquid_private_key: Option<String>,
    pub aster_user: Option<String>,
    pub aster_signer: Option<String>,
    pub aster_private_key: Option<String>,
    pub testnet: i32,
    pub initial_balance: String,
    pub scan_interval_minutes: i32,
    pub enabled: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Columns rewritten by an upsert. Leaves `trader_id` and `created_at` alone.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = traders)]
#[diesel(treat_none_as_null = true)]
pub struct TraderChangeset {
    pub name: String,
    pub ai_model: String,
    pub model_api_key: Option<String>,
    pub model_secret_key: Option<String>,
    pub model_base_url: Option<String>,
    pub model_name: Option<String>,
    pub exchange: String,
    pub binance_api_key: Option<String>,
    pub binance_secret_key: Option<String>,
    pub hyperliquid_private_key: Option<String>,
    pub aster_user: Option<String>,
    pub aster_signer: Option<String>,
    pub aster_private_key: Option<String>,
    pub testnet: i32,
    pub initial_balance: String,
    pub scan_interval_minutes: i32,
    pub enabled: i32,
    pub updated_at: String,
}

impl TraderRow {
    /// Build a row from a record, stamping both timestamps with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the scan interval does not fit the column.
    pub fn from_record(record: &TraderRecord, now: &str) -> Result<Self> {
        let scan_interval_minutes = i32::try_from(record.scan_interval_minutes)
            .map_err(|e| Error::Parse(format!("scan_interval_minutes: {e}")))?;

        Ok(Self {
            trader_id: record.trader_id.to_string(),
            name: record.name.clone(),
            ai_model: record.ai_model.clone(),
            model_api_key: record.model_api_key.clone(),
            model_secret_key: record.model_secret_key.clone(),
            model_base_url: record.model_base_url.clone(),
            model_name: record.model_name.clone(),
            exchange: record.exchange.clone(),
            binance_api_key: record.binance_api_key.clone(),
            binance_secret_key: record.binance_secret_key.clone(),
            hyperliquid_private_key: record.hyperliquid_private_key.clone(),
            aster_user: record.aster_user.clone(),
            aster_signer: record.aster_signer.clone(),
            aster_private_key: record.aster_private_key.clone(),
            testnet: i32::from(record.testnet),
            initial_balance: record.initial_balance.to_string(),
            scan_interval_minutes,
            enabled: i32::from(record.enabled),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }

    #[must_use]
    pub fn changeset(&self) -> TraderChangeset {
        TraderChangeset {
            name: self.name.clone(),
            ai_model: self.ai_model.clone(),
            model_api_key: self.model_api_key.clone(),
            model_secret_key: self.model_secret_key.clone(),
            model_base_url: self.model_base_url.clone(),
            model_name: self.model_name.clone(),
            exchange: self.exchange.clone(),
            binance_api_key: self.binance_api_key.clone(),
            binance_secret_key: self.binance_secret_key.clone(),
            hyperliquid_private_key: self.hyperliquid_private_key.clone(),
            aster_user: self.aster_user.clone(),
            aster_signer: self.aster_signer.clone(),
            aster_private_key: self.aster_private_key.clone(),
            testnet: self.testnet,
            initial_balance: self.initial_balance.clone(),
            scan_interval_minutes: self.scan_interval_minutes,
            enabled: self.enabled,
            updated_at: self.updated_at.clone(),
        }
    }

    /// Convert back into a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for a corrupt balance or a negative interval.
    pub fn into_record(self) -> Result<TraderRecord> {
        let initial_balance = Decimal::from_str(&self.initial_balance).map_err(|e| {
            Error::Parse(format!(
                "initial_balance for trader '{}': {e}",
                self.trader_id
            ))
        })?;
        let scan_interval_minutes = u32::try_from(self.scan_interval_minutes).map_err(|e| {
            Error::Parse(format!(
                "scan_interval_minutes for trader '{}': {e}",
                self.trader_id
            ))
        })?;

        Ok(TraderRecord {
            trader_id: TraderId::from(self.trader_id),
            name: self.name,
            ai_model: self.ai_model,
            model_api_key: self.model_api_key,
            model_secret_key: self.model_secret_key,
            model_base_url: self.model_base_url,
            model_name: self.model_name,
            exchange: self.exchange,
            binance_api_key: self.binance_api_key,
            binance_secret_key: self.binance_secret_key,
            hyperliquid_private_key: self.hyperliquid_private_key,
            aster_user: self.aster_user,
            aster_signer: self.aster_signer,
            aster_private_key: self.aster_private_key,
            testnet: self.testnet != 0,
            initial_balance,
            scan_interval_minutes,
            enabled: self.enabled != 0,
        })
    }
}
