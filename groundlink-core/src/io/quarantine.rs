//! ## groundlink-core::io::quarantine
//! Default quarantine sink: log the rejected message and move on.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::Quarantiner;
use crate::error::{QuarantineError, WriteError};

#[derive(Debug, Clone)]
pub struct LogQuarantiner {
    pipeline: String,
}

impl LogQuarantiner {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
        }
    }
}

#[async_trait]
impl Quarantiner for LogQuarantiner {
    async fn quarantine(
        &mut self,
        _cancel: &CancellationToken,
        msg: &[u8],
        cause: &WriteError,
    ) -> Result<usize, QuarantineError> {
        warn!(
            pipeline = %self.pipeline,
            len = msg.len(),
            payload = %hex::encode(msg),
            error = %cause,
            "Quarantining message but performing no action with it"
        );
        Ok(msg.len())
    }
}
