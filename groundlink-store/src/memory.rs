//! ## groundlink-store::memory
//! **In-process telemetry store**
//!
//! Rows are appended in arrival order; range queries sort by timestamp with a
//! stable sort, so packets sharing a timestamp keep their arrival order.

use async_trait::async_trait;
use groundlink_protocols::{Anomaly, TelemetryPacket};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::range::TimeRange;
use crate::stats::PayloadStats;
use crate::TelemetryStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    packets: RwLock<Vec<TelemetryPacket>>,
    anomalies: RwLock<Vec<Anomaly>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packet_count(&self) -> usize {
        self.packets.read().len()
    }

    pub fn anomaly_count(&self) -> usize {
        self.anomalies.read().len()
    }
}

#[async_trait]
impl TelemetryStore for MemoryStore {
    async fn insert_packet(&self, packet: &TelemetryPacket) -> Result<(), StoreError> {
        self.packets.write().push(*packet);
        Ok(())
    }

    async fn insert_anomaly(&self, anomaly: &Anomaly) -> Result<(), StoreError> {
        self.anomalies.write().push(*anomaly);
        Ok(())
    }

    async fn fetch_by_range(&self, range: TimeRange) -> Result<Vec<TelemetryPacket>, StoreError> {
        let mut found: Vec<TelemetryPacket> = self
            .packets
            .read()
            .iter()
            .filter(|p| range.contains(p.timestamp()))
            .copied()
            .collect();
        found.sort_by_key(TelemetryPacket::timestamp);
        Ok(found)
    }

    async fn fetch_latest(&self) -> Result<Option<TelemetryPacket>, StoreError> {
        // max_by_key keeps the last maximum, i.e. the most recently inserted tie.
        Ok(self
            .packets
            .read()
            .iter()
            .max_by_key(|p| p.timestamp())
            .copied())
    }

    async fn fetch_anomalies_by_range(
        &self,
        range: TimeRange,
    ) -> Result<Vec<Anomaly>, StoreError> {
        let mut found: Vec<Anomaly> = self
            .anomalies
            .read()
            .iter()
            .filter(|a| range.contains(a.timestamp))
            .copied()
            .collect();
        found.sort_by_key(|a| a.timestamp);
        Ok(found)
    }

    async fn payload_stats_by_range(&self, range: TimeRange) -> Result<PayloadStats, StoreError> {
        let packets = self.packets.read();
        Ok(PayloadStats::from_payloads(
            packets
                .iter()
                .filter(|p| range.contains(p.timestamp()))
                .map(|p| &p.payload),
        ))
    }
}
