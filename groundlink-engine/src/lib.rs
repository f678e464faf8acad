//! # groundlink-engine
//!
//! Wires the generic pipeline engine into the telemetry gateway: one UDP
//! ingest pipeline feeding two persistence pipelines through bounded
//! hand-off queues.

pub mod engine;

pub use engine::{Gateway, GatewayError, TelemetryWriter};

pub mod prelude {
    pub use crate::engine::{Gateway, GatewayError, TelemetryWriter};
}
