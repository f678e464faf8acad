//! ## groundlink-store::writers
//! **Pipeline writers that persist into a [`TelemetryStore`]**
//!
//! Decode failures are reported as `WriteError::Malformed` and store failures
//! as `WriteError::Storage`, so the processor can quarantine either.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use groundlink_core::error::WriteError;
use groundlink_core::io::Writer;
use groundlink_protocols::{Anomaly, TelemetryPacket};
use groundlink_telemetry::EventLogger;
use opentelemetry::KeyValue;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::TelemetryStore;

pub struct PacketStoreWriter {
    store: Arc<dyn TelemetryStore>,
}

impl PacketStoreWriter {
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Writer for PacketStoreWriter {
    async fn write(&mut self, cancel: &CancellationToken, msg: Bytes) -> Result<usize, WriteError> {
        let packet = TelemetryPacket::decode(&msg).map_err(WriteError::malformed)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WriteError::Cancelled),
            inserted = self.store.insert_packet(&packet) => inserted.map_err(WriteError::storage)?,
        }

        debug!(
            seq = packet.primary_header.sequence_count(),
            timestamp = packet.timestamp(),
            "Stored telemetry packet"
        );
        Ok(msg.len())
    }

    async fn close(&mut self) -> Result<(), WriteError> {
        Ok(())
    }
}

pub struct AnomalyStoreWriter {
    store: Arc<dyn TelemetryStore>,
}

impl AnomalyStoreWriter {
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Writer for AnomalyStoreWriter {
    async fn write(&mut self, cancel: &CancellationToken, msg: Bytes) -> Result<usize, WriteError> {
        let anomaly = Anomaly::decode(&msg).map_err(WriteError::malformed)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WriteError::Cancelled),
            inserted = self.store.insert_anomaly(&anomaly) => inserted.map_err(WriteError::storage)?,
        }

        debug!(
            field = %anomaly.field,
            value = anomaly.value,
            timestamp = anomaly.timestamp,
            "Stored anomaly"
        );

        EventLogger::log_event(
            "anomaly_detected",
            vec![
                KeyValue::new("field", anomaly.field.as_str()),
                KeyValue::new("value", f64::from(anomaly.value)),
                KeyValue::new("timestamp", anomaly.timestamp as i64),
            ],
        )
        .await;
        Ok(msg.len())
    }

    async fn close(&mut self) -> Result<(), WriteError> {
        Ok(())
    }
}
