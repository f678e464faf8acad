//! # Groundlink Protocol Codecs
//!
//! Crate for the fixed binary telemetry frame sent by the ground-station
//! emulator and the compact anomaly record passed between pipeline stages.

pub mod anomaly;
pub mod packet;

pub use anomaly::{Anomaly, AnomalyField, AnomalyParseError};
pub use packet::{
    PacketParseError, PrimaryHeader, SecondaryHeader, TelemetryPacket, TelemetryPayload,
    PACKET_LEN,
};
