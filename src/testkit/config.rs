//! Canonical test configurations.
//!
//! Single source of truth for config values used across tests.

use std::time::Duration;

use crate::application::invocation::RetryPolicy;

/// Retry policy with the production ceiling and no waiting.
pub fn retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

/// Stop timeout short enough to keep abort paths fast.
pub fn stop_timeout() -> Duration {
    Duration::from_secs(2)
}

/// Minimal valid config file with `database` pointed at `database`.
pub fn config_toml(database: &str) -> String {
    format!(
        r#"database = "{database}"

[logging]
level = "warn"
format = "pretty"

[llm]
timeout_secs = 30
max_attempts = 3
backoff_unit_ms = 10

[fleet]
stop_timeout_secs = 2
"#
    )
}
