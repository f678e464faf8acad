//! Composite writer for the ingest pipeline.
//!
//! Each datagram is decoded, forwarded unchanged to the packet queue, then
//! scanned for threshold violations; every anomaly found is forwarded to the
//! anomaly queue as its 13-byte record. Closing this writer closes both
//! queues, which is what stops the downstream pipelines.

use async_trait::async_trait;
use bytes::Bytes;
use groundlink_core::error::WriteError;
use groundlink_core::io::Writer;
use groundlink_detection::ThresholdEngine;
use groundlink_protocols::TelemetryPacket;
use groundlink_telemetry::MetricsRecorder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub struct TelemetryWriter {
    packets: Box<dyn Writer>,
    anomalies: Box<dyn Writer>,
    detector: ThresholdEngine,
    metrics: Option<MetricsRecorder>,
}

impl TelemetryWriter {
    pub fn new(packets: Box<dyn Writer>, anomalies: Box<dyn Writer>) -> Self {
        Self {
            packets,
            anomalies,
            detector: ThresholdEngine::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl Writer for TelemetryWriter {
    async fn write(&mut self, cancel: &CancellationToken, msg: Bytes) -> Result<usize, WriteError> {
        let packet = TelemetryPacket::decode(&msg).map_err(WriteError::malformed)?;
        trace!(
            seq = packet.primary_header.sequence_count(),
            timestamp = packet.timestamp(),
            "Decoded telemetry packet"
        );

        let len = msg.len();
        self.packets.write(cancel, msg).await?;

        let anomalies = self.detector.packet_scan(&packet);
        if anomalies.is_empty() {
            return Ok(len);
        }

        if let Some(metrics) = &self.metrics {
            metrics.add_anomalies(anomalies.len());
        }
        for anomaly in &anomalies {
            debug!(field = %anomaly.field, value = anomaly.value, "Threshold violated");
            self.anomalies.write(cancel, anomaly.encode()).await?;
        }
        Ok(len)
    }

    async fn close(&mut self) -> Result<(), WriteError> {
        let packets = self.packets.close().await;
        let anomalies = self.anomalies.close().await;
        packets.and(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use groundlink_core::io::{handoff, ChannelReader, Reader};
    use groundlink_protocols::{Anomaly, AnomalyField, TelemetryPayload};

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(20);

    fn writer() -> (TelemetryWriter, ChannelReader, ChannelReader) {
        let (packet_tx, packet_rx) = handoff(8, TIMEOUT);
        let (anomaly_tx, anomaly_rx) = handoff(8, TIMEOUT);
        (
            TelemetryWriter::new(Box::new(packet_tx), Box::new(anomaly_tx)),
            packet_rx,
            anomaly_rx,
        )
    }

    fn frame(temperature: f32, battery: f32) -> Bytes {
        TelemetryPacket::standalone(
            1,
            500,
            TelemetryPayload {
                temperature,
                battery,
                altitude: 525.0,
                signal: -50.0,
            },
        )
        .encode()
    }

    async fn drain(reader: &mut ChannelReader) -> Vec<Vec<u8>> {
        let cancel = CancellationToken::new();
        let mut out = Vec::new();
        let mut buf = [0u8; 64];
        while !reader.is_closed() {
            let n = reader.read(&cancel, &mut buf).await.unwrap();
            if n > 0 {
                out.push(buf[..n].to_vec());
            }
        }
        out
    }

    #[tokio::test]
    async fn test_fans_out_packet_and_anomalies() {
        let (mut writer, mut packets, mut anomalies) = writer();
        let cancel = CancellationToken::new();

        writer.write(&cancel, frame(25.0, 85.0)).await.unwrap();
        writer.write(&cancel, frame(38.0, 25.0)).await.unwrap();
        writer.close().await.unwrap();

        let packets = drain(&mut packets).await;
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1], frame(38.0, 25.0).to_vec());

        let anomalies: Vec<Anomaly> = drain(&mut anomalies)
            .await
            .iter()
            .map(|raw| Anomaly::decode(raw).unwrap())
            .collect();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::new(AnomalyField::Temperature, 38.0, 500),
                Anomaly::new(AnomalyField::Battery, 25.0, 500),
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_frame_forwards_nothing() {
        let (mut writer, mut packets, mut anomalies) = writer();
        let cancel = CancellationToken::new();

        let err = writer
            .write(&cancel, Bytes::from_static(&[0x08, 0x01, 0xC0]))
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::Malformed(_)));

        writer.close().await.unwrap();
        assert!(drain(&mut packets).await.is_empty());
        assert!(drain(&mut anomalies).await.is_empty());
    }

    #[tokio::test]
    async fn test_anomalies_counted() {
        let (writer, _packets, _anomalies) = writer();
        let metrics = MetricsRecorder::new().unwrap();
        let mut writer = writer.with_metrics(metrics.clone());

        writer
            .write(&CancellationToken::new(), frame(36.0, 10.0))
            .await
            .unwrap();
        assert_eq!(metrics.anomalies_detected.get(), 2);
    }
}
