//! ## groundlink-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry key/values**
//!
//! Two output flavours:
//! - `Json`: one JSON object per line, for deployed gateways
//! - `Pretty`: coloured, multi-line output for local development
//!
//! `RUST_LOG` overrides the configured level when set.

use opentelemetry::KeyValue;
use thiserror::Error;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("Global subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Development mode gets the pretty formatter.
    pub fn from_dev_mode(dev_mode: bool) -> Self {
        if dev_mode {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber.
    pub fn init(level: &str, format: LogFormat) -> Result<(), LoggingError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
                filter: level.to_string(),
                reason: e.to_string(),
            })?,
        };

        let installed = match format {
            LogFormat::Json => fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(true)
                .with_thread_names(true)
                .try_init(),
            LogFormat::Pretty => fmt()
                .pretty()
                .with_env_filter(filter)
                .with_ansi(true)
                .with_thread_names(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .try_init(),
        };

        installed.map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
    }

    /// Emits a structured alert event, e.g. a detected anomaly.
    #[inline]
    pub async fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "telemetry_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );

        async {
            tracing::warn!(
                metadata = ?metadata,
                "Telemetry alert raised"
            );
        }
        .instrument(span)
        .await
    }
}
