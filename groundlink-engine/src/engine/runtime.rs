//! Gateway runtime - runs the ingest, packet and anomaly pipelines together
//!
//! ```text
//! UDP ─▶ [ingest: TelemetryWriter] ─▶ packets queue ─▶ [packets: PacketStoreWriter]
//!                                  └▶ anomalies queue ─▶ [anomalies: AnomalyStoreWriter]
//! ```
//!
//! All three run in one fail-fast group. External shutdown only cancels the
//! ingest pipeline; its writer then closes both queues and the persistence
//! pipelines stop once they have drained what was already queued.

use std::net::SocketAddr;
use std::sync::Arc;

use groundlink_capture::UdpReader;
use groundlink_config::{GroundlinkConfig, PipelineConfig};
use groundlink_core::group::TaskGroup;
use groundlink_core::io::{handoff, LogQuarantiner, Reader, Writer};
use groundlink_core::{PipelineError, Processor, ProcessorConfig};
use groundlink_store::{AnomalyStoreWriter, PacketStoreWriter, TelemetryStore};
use groundlink_telemetry::MetricsRecorder;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::error::GatewayError;
use super::telemetry_writer::TelemetryWriter;

const INGEST: &str = "ingest";
const PACKETS: &str = "packets";
const ANOMALIES: &str = "anomalies";

pub struct Gateway {
    config: GroundlinkConfig,
    reader: UdpReader,
    store: Arc<dyn TelemetryStore>,
    metrics: MetricsRecorder,
}

impl Gateway {
    /// Binds the UDP listener. Nothing is read until [`Gateway::run`].
    pub async fn bind(
        config: GroundlinkConfig,
        store: Arc<dyn TelemetryStore>,
        metrics: MetricsRecorder,
    ) -> Result<Self, GatewayError> {
        let addr = config.gateway.listen_addr;
        let reader = UdpReader::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;

        Ok(Self {
            config,
            reader,
            store,
            metrics,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        let addr = self.config.gateway.listen_addr;
        self.reader
            .local_addr()
            .map_err(|source| GatewayError::Bind { addr, source })
    }

    /// Runs until `shutdown` fires and the queues drain, or until any pipeline
    /// fails fatally.
    #[instrument(skip_all)]
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), GatewayError> {
        let Gateway {
            config,
            reader,
            store,
            metrics,
        } = self;
        let pipeline = &config.pipeline;
        let buffer_size = config.gateway.buffer_size;

        let (packet_tx, packet_rx) = handoff(pipeline.queue_capacity, pipeline.read_timeout());
        let (anomaly_tx, anomaly_rx) = handoff(pipeline.queue_capacity, pipeline.read_timeout());

        let ingest = processor(
            INGEST,
            buffer_size,
            pipeline,
            Box::new(reader),
            Box::new(
                TelemetryWriter::new(Box::new(packet_tx), Box::new(anomaly_tx))
                    .with_metrics(metrics.clone()),
            ),
            &metrics,
        );
        let packets = processor(
            PACKETS,
            buffer_size,
            pipeline,
            Box::new(packet_rx),
            Box::new(PacketStoreWriter::new(store.clone())),
            &metrics,
        );
        let anomalies = processor(
            ANOMALIES,
            buffer_size,
            pipeline,
            Box::new(anomaly_rx),
            Box::new(AnomalyStoreWriter::new(store)),
            &metrics,
        );

        let mut group = TaskGroup::new(&CancellationToken::new());
        let ingest_token = group.token().child_token();

        {
            let ingest_token = ingest_token.clone();
            group.spawn("shutdown-watch", move |group_token| async move {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Shutdown requested, stopping ingest");
                        ingest_token.cancel();
                    }
                    _ = ingest_token.cancelled() => {}
                    _ = group_token.cancelled() => {}
                }
                Ok(())
            });
        }
        group.spawn(INGEST, move |_group_token| async move {
            let result = drive(ingest, &ingest_token).await;
            ingest_token.cancel();
            result
        });
        group.spawn(PACKETS, move |token| async move { drive(packets, &token).await });
        group.spawn(ANOMALIES, move |token| async move { drive(anomalies, &token).await });

        info!("Gateway running");
        group.wait().await?;
        info!("Gateway stopped");
        Ok(())
    }
}

fn processor(
    name: &str,
    buffer_size: usize,
    pipeline: &PipelineConfig,
    reader: Box<dyn Reader>,
    writer: Box<dyn Writer>,
    metrics: &MetricsRecorder,
) -> Processor {
    let config = ProcessorConfig::new(name, buffer_size)
        .with_return_on_writer_error(pipeline.return_on_writer_error)
        .with_return_context_error(pipeline.return_context_error)
        .with_ignore_context_error(pipeline.ignore_context_error);

    Processor::new(config, reader, writer, Box::new(LogQuarantiner::new(name)))
        .with_metrics(metrics.clone())
}

/// Runs a processor to completion, then closes its writer.
async fn drive(mut processor: Processor, cancel: &CancellationToken) -> Result<(), PipelineError> {
    let result = processor.start(cancel).await;
    let closed = processor.close().await;
    if let Err(e) = &closed {
        warn!(pipeline = processor.name(), error = %e, "Writer close failed");
    }
    result.and(closed)
}
