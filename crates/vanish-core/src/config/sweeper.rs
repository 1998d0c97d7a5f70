//! Reclamation sweeper configuration.

use serde::{Deserialize, Serialize};

/// Background sweeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Whether the periodic sweeper runs inside the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between sweeps.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Run one sweep immediately at startup instead of waiting a full period.
    #[serde(default)]
    pub sweep_on_start: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_seconds: default_interval(),
            sweep_on_start: false,
        }
    }
}

impl SweeperConfig {
    /// Sweep period as a std duration.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_seconds)
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    300
}
