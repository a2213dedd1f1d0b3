//! Advisory trading cycle.
//!
//! Each cycle asks the trader's model for a decision and records it. Order
//! placement is not wired in; the decision text is the cycle's output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::application::invocation::InvocationClient;
use crate::domain::{InvocationConfig, TraderConfig};
use crate::error::Result;
use crate::port::outbound::cycle::{CycleContext, CycleFactory, TradingCycle};

/// Longest decision excerpt written to logs.
const LOG_EXCERPT_CHARS: usize = 200;

/// Model-backed cycle for one trader.
pub struct AdvisoryCycle {
    config: Arc<TraderConfig>,
    client: InvocationClient,
    invocation: InvocationConfig,
    system_prompt: String,
    last_decision: Mutex<Option<String>>,
}

impl AdvisoryCycle {
    #[must_use]
    pub fn new(config: Arc<TraderConfig>, client: InvocationClient, timeout: Duration) -> Self {
        let invocation = config.invocation_config(timeout);
        let system_prompt = system_prompt(&config);
        Self {
            config,
            client,
            invocation,
            system_prompt,
            last_decision: Mutex::new(None),
        }
    }

    fn user_prompt(&self, ctx: &CycleContext) -> String {
        format!(
            "Cycle #{cycle} at {now}\n\
             Account balance: {balance} USDT\n\
             Trading enabled: {enabled}\n\n\
             Review current conditions and reply with one decision per line \
             in the form `SYMBOL ACTION SIZE REASON`, or `HOLD` with a reason.",
            cycle = ctx.cycle,
            now = Utc::now().to_rfc3339(),
            balance = self.config.initial_balance,
            enabled = ctx.trading_enabled,
        )
    }
}

fn system_prompt(config: &TraderConfig) -> String {
    format!(
        "You are {name}, an autonomous crypto futures trader on {exchange}.\n\
         Rules:\n\
         - Risk at most 2% of the account on a single position.\n\
         - Never open a position without a stop loss.\n\
         - Prefer holding over low-conviction trades.\n\
         Answer with decisions only, no commentary.",
        name = config.name,
        exchange = config.exchange.kind(),
    )
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(LOG_EXCERPT_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[async_trait]
impl TradingCycle for AdvisoryCycle {
    async fn run_cycle(&self, ctx: &CycleContext) -> Result<()> {
        if !ctx.trading_enabled {
            debug!(trader_id = %ctx.trader_id, cycle = ctx.cycle, "Trading disabled, cycle skipped");
            return Ok(());
        }

        let user_prompt = self.user_prompt(ctx);
        let decision = self
            .client
            .invoke(&self.invocation, &self.system_prompt, &user_prompt)
            .await?;

        info!(
            trader_id = %ctx.trader_id,
            cycle = ctx.cycle,
            provider = %self.invocation.provider,
            decision = excerpt(&decision),
            "Decision received"
        );
        *self.last_decision.lock() = Some(decision);
        Ok(())
    }

    fn last_output(&self) -> Option<String> {
        self.last_decision.lock().clone()
    }
}

/// Builds an [`AdvisoryCycle`] per trader over one shared client.
pub struct AdvisoryCycleFactory {
    client: InvocationClient,
    timeout: Duration,
}

impl AdvisoryCycleFactory {
    #[must_use]
    pub fn new(client: InvocationClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl CycleFactory for AdvisoryCycleFactory {
    fn build(&self, config: Arc<TraderConfig>) -> Result<Arc<dyn TradingCycle>> {
        Ok(Arc::new(AdvisoryCycle::new(
            config,
            self.client.clone(),
            self.timeout,
        )))
    }
}
