//! Hand-off queue sizing and processor failure policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct PipelineConfig {
    /// Capacity of each bounded hand-off queue.
    #[validate(range(min = 1, max = 65536))]
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How long a queue reader waits before reporting an idle read.
    #[validate(range(min = 1, max = 600_000))]
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default)]
    pub return_on_writer_error: bool,

    #[serde(default)]
    pub return_context_error: bool,

    #[serde(default)]
    pub ignore_context_error: bool,
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_read_timeout_ms() -> u64 {
    5000
}

impl PipelineConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            read_timeout_ms: default_read_timeout_ms(),
            return_on_writer_error: false,
            return_context_error: false,
            ignore_context_error: false,
        }
    }
}
