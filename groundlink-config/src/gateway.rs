//! UDP listener configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct GatewayConfig {
    /// Address the telemetry listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Size of each pooled read buffer in bytes.
    #[validate(range(min = 32, max = 65536))]
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8089))
}

fn default_buffer_size() -> usize {
    1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            buffer_size: default_buffer_size(),
        }
    }
}
