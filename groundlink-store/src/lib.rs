//! # groundlink-store
//!
//! Persistence boundary for decoded telemetry and anomalies.
//!
//! ### Key Submodules:
//! - `range`: inclusive time windows parsed from RFC 3339 query values
//! - `memory`: the in-process [`TelemetryStore`]
//! - `writers`: pipeline writers that persist packets and anomalies

pub mod error;
pub mod memory;
pub mod range;
pub mod stats;
pub mod writers;

use async_trait::async_trait;
use groundlink_protocols::{Anomaly, TelemetryPacket};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use range::TimeRange;
pub use stats::{FieldStats, PayloadStats};
pub use writers::{AnomalyStoreWriter, PacketStoreWriter};

/// Storage for telemetry packets and the anomalies derived from them.
///
/// Range queries are inclusive on both ends and ordered by ascending
/// timestamp.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn insert_packet(&self, packet: &TelemetryPacket) -> Result<(), StoreError>;

    async fn insert_anomaly(&self, anomaly: &Anomaly) -> Result<(), StoreError>;

    async fn fetch_by_range(&self, range: TimeRange) -> Result<Vec<TelemetryPacket>, StoreError>;

    /// The packet with the highest timestamp, if any.
    async fn fetch_latest(&self) -> Result<Option<TelemetryPacket>, StoreError>;

    async fn fetch_anomalies_by_range(&self, range: TimeRange)
        -> Result<Vec<Anomaly>, StoreError>;

    /// Min/max/avg per sensor field; all zeroes when no packet falls in range.
    async fn payload_stats_by_range(&self, range: TimeRange) -> Result<PayloadStats, StoreError>;
}
