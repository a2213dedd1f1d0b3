//! Worker cycle port.
//!
//! A trading cycle is opaque to the fleet: the registry only schedules it,
//! hands it the live trading switch, and counts outcomes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{TraderConfig, TraderId};
use crate::error::Result;

/// Per-iteration context passed to a cycle.
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub trader_id: TraderId,
    /// 1-based iteration number.
    pub cycle: u64,
    /// Live trading switch, read at the cycle boundary.
    pub trading_enabled: bool,
}

/// One worker's repeating decision cycle.
///
/// A call runs to completion; cancellation is only observed between calls.
#[async_trait]
pub trait TradingCycle: Send + Sync {
    async fn run_cycle(&self, ctx: &CycleContext) -> Result<()>;

    /// Output of the most recent successful cycle, if the cycle keeps one.
    fn last_output(&self) -> Option<String> {
        None
    }
}

/// Builds the cycle for a newly registered trader.
pub trait CycleFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the trader's configuration cannot back a cycle.
    fn build(&self, config: Arc<TraderConfig>) -> Result<Arc<dyn TradingCycle>>;
}
