//! # Groundlink Telemetry and Monitoring
//!
//! Crate for logging, alert events, and pipeline metrics.

pub mod logging;
pub mod metrics;

pub use logging::{EventLogger, LogFormat, LoggingError};
pub use metrics::MetricsRecorder;
