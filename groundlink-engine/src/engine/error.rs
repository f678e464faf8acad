use std::net::SocketAddr;

use groundlink_core::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to bind telemetry listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline failure: {0}")]
    Pipeline(#[from] PipelineError),
}
