//! ## groundlink-telemetry::metrics
//! **Prometheus counters for the ingestion pipelines**
//!
//! Per-pipeline series are labelled with the instance name
//! (`ingest`, `packets`, `anomalies`).

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

const PIPELINE_LABEL: &str = "pipeline";

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub messages_read: IntCounterVec,
    pub messages_written: IntCounterVec,
    pub write_failures: IntCounterVec,
    pub messages_quarantined: IntCounterVec,
    pub anomalies_detected: IntCounter,
    pub write_latency: HistogramVec,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let messages_read = IntCounterVec::new(
            Opts::new("groundlink_messages_read_total", "Messages pulled from a reader"),
            &[PIPELINE_LABEL],
        )?;
        let messages_written = IntCounterVec::new(
            Opts::new(
                "groundlink_messages_written_total",
                "Messages accepted by a writer",
            ),
            &[PIPELINE_LABEL],
        )?;
        let write_failures = IntCounterVec::new(
            Opts::new("groundlink_write_failures_total", "Writer errors"),
            &[PIPELINE_LABEL],
        )?;
        let messages_quarantined = IntCounterVec::new(
            Opts::new(
                "groundlink_messages_quarantined_total",
                "Messages handed to a quarantiner",
            ),
            &[PIPELINE_LABEL],
        )?;
        let anomalies_detected = IntCounter::new(
            "groundlink_anomalies_detected_total",
            "Threshold violations found in decoded packets",
        )?;
        let write_latency = HistogramVec::new(
            HistogramOpts::new(
                "groundlink_write_latency_seconds",
                "Time spent inside Writer::write",
            )
            .buckets(vec![0.000_01, 0.000_1, 0.001, 0.01, 0.1, 1.0]),
            &[PIPELINE_LABEL],
        )?;

        registry.register(Box::new(messages_read.clone()))?;
        registry.register(Box::new(messages_written.clone()))?;
        registry.register(Box::new(write_failures.clone()))?;
        registry.register(Box::new(messages_quarantined.clone()))?;
        registry.register(Box::new(anomalies_detected.clone()))?;
        registry.register(Box::new(write_latency.clone()))?;

        Ok(Self {
            registry,
            messages_read,
            messages_written,
            write_failures,
            messages_quarantined,
            anomalies_detected,
            write_latency,
        })
    }

    #[inline]
    pub fn inc_read(&self, pipeline: &str) {
        self.messages_read.with_label_values(&[pipeline]).inc();
    }

    #[inline]
    pub fn inc_written(&self, pipeline: &str) {
        self.messages_written.with_label_values(&[pipeline]).inc();
    }

    #[inline]
    pub fn inc_write_failure(&self, pipeline: &str) {
        self.write_failures.with_label_values(&[pipeline]).inc();
    }

    #[inline]
    pub fn inc_quarantined(&self, pipeline: &str) {
        self.messages_quarantined.with_label_values(&[pipeline]).inc();
    }

    #[inline]
    pub fn add_anomalies(&self, count: usize) {
        self.anomalies_detected.inc_by(count as u64);
    }

    #[inline]
    pub fn observe_write_latency(&self, pipeline: &str, seconds: f64) {
        self.write_latency
            .with_label_values(&[pipeline])
            .observe(seconds);
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_labelled_per_pipeline() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.inc_read("ingest");
        metrics.inc_read("ingest");
        metrics.inc_quarantined("packets");

        assert_eq!(metrics.messages_read.with_label_values(&["ingest"]).get(), 2);
        assert_eq!(
            metrics
                .messages_quarantined
                .with_label_values(&["packets"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .messages_quarantined
                .with_label_values(&["ingest"])
                .get(),
            0
        );
    }

    #[test]
    fn test_gather_metrics_text() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.add_anomalies(4);
        metrics.observe_write_latency("anomalies", 0.002);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("groundlink_anomalies_detected_total 4"));
        assert!(text.contains("groundlink_write_latency_seconds_bucket"));
    }
}
