//! ## groundlink-simulator::emitter
//! Sends generated frames over UDP at a fixed interval.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::generator::PacketGenerator;

#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("Failed to open emitter socket to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub sent: u64,
    pub anomalous: u64,
    pub failed: u64,
}

pub struct UdpEmitter {
    socket: UdpSocket,
    generator: PacketGenerator,
    interval: Duration,
}

impl UdpEmitter {
    pub async fn connect(
        target: SocketAddr,
        generator: PacketGenerator,
        interval: Duration,
    ) -> Result<Self, EmitterError> {
        let bind_addr: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let connect_err = |source| EmitterError::Connect {
            addr: target,
            source,
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(connect_err)?;
        socket.connect(target).await.map_err(connect_err)?;
        Ok(Self {
            socket,
            generator,
            interval,
        })
    }

    /// Emits until `count` frames were attempted (forever when `None`) or
    /// cancellation. Send failures are logged and counted, not fatal.
    pub async fn run(&mut self, cancel: &CancellationToken, count: Option<u64>) -> EmitSummary {
        let mut summary = EmitSummary::default();
        let mut ticker = interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while count.map_or(true, |limit| self.generator.count() < limit) {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let timestamp = Utc::now().timestamp().max(0) as u64;
            let generated = self.generator.next_packet(timestamp);
            let seq = generated.packet.primary_header.sequence_count();

            match self.socket.send(&generated.packet.encode()).await {
                Ok(_) => {
                    summary.sent += 1;
                    match generated.anomaly {
                        Some(field) => {
                            summary.anomalous += 1;
                            info!(seq, %field, "Sent anomalous telemetry packet");
                        }
                        None => info!(seq, "Sent nominal telemetry packet"),
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(seq, error = %e, "Failed to send telemetry packet");
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use groundlink_protocols::{TelemetryPacket, PACKET_LEN};

    use super::*;

    #[tokio::test]
    async fn test_emits_count_frames() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = receiver.local_addr().unwrap();

        let mut emitter = UdpEmitter::connect(
            target,
            PacketGenerator::new(2, Some(11)),
            Duration::from_millis(1),
        )
        .await
        .unwrap();
        let summary = emitter.run(&CancellationToken::new(), Some(4)).await;
        assert_eq!(summary.sent, 4);
        assert_eq!(summary.anomalous, 2);

        let mut buf = [0u8; 64];
        for expected_seq in 0..4u16 {
            let n = receiver.recv(&mut buf).await.unwrap();
            assert_eq!(n, PACKET_LEN);
            let packet = TelemetryPacket::decode(&buf[..n]).unwrap();
            assert_eq!(packet.primary_header.sequence_count(), expected_seq);
        }
    }

    #[tokio::test]
    async fn test_cancellation_stops_unbounded_run() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut emitter = UdpEmitter::connect(
            receiver.local_addr().unwrap(),
            PacketGenerator::new(5, Some(1)),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = emitter.run(&cancel, None).await;
        assert_eq!(summary, EmitSummary::default());
    }
}
