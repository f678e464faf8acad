//! Synthetic telemetry generator configuration.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct GeneratorConfig {
    /// Where generated frames are sent.
    #[serde(default = "default_target_addr")]
    pub target_addr: SocketAddr,

    #[validate(range(min = 1, max = 3_600_000))]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Every Nth packet carries one out-of-range reading.
    #[validate(range(min = 1))]
    #[serde(default = "default_anomaly_every")]
    pub anomaly_every: u64,
}

fn default_target_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8089))
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_anomaly_every() -> u64 {
    5
}

impl GeneratorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target_addr: default_target_addr(),
            interval_ms: default_interval_ms(),
            anomaly_every: default_anomaly_every(),
        }
    }
}
