//! Fleet lifecycle configuration.

use std::time::Duration;

use serde::Deserialize;

/// Worker lifecycle settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FleetConfig {
    /// How long a stop waits for a worker's current cycle before aborting it.
    ///
    /// Defaults to 30 seconds.
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
}

impl FleetConfig {
    #[must_use]
    pub const fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            stop_timeout_secs: default_stop_timeout_secs(),
        }
    }
}

const fn default_stop_timeout_secs() -> u64 {
    30
}
