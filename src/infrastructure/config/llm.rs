//! Model invocation configuration.
//!
//! Provider credentials are per trader and live in the desired-state store.
//! This section only tunes the shared invocation client.

use std::time::Duration;

use serde::Deserialize;

use crate::application::invocation::RetryPolicy;

/// Invocation client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Per-request timeout in seconds.
    ///
    /// Defaults to 120; model responses for full market context are slow.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per invocation, including the first. Defaults to 3.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff unit in milliseconds. Defaults to 2000.
    ///
    /// The wait before attempt `n + 1` is `n` units.
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

impl LlmConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.backoff_unit_ms),
        )
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_unit_ms: default_backoff_unit_ms(),
        }
    }
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff_unit_ms() -> u64 {
    2000
}
