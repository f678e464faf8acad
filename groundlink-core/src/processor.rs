//! ## groundlink-core::processor
//! **Single-threaded read → write → quarantine loop**
//!
//! One processor moves messages from a [`Reader`] to a [`Writer`], one at a
//! time, until cancellation, an exhausted source, or a fatal error. A message
//! the writer rejects is routed to the [`Quarantiner`], and by default the loop
//! keeps going so one poisoned message cannot stall the stream.
//!
//! Reader failures are always fatal. Writer failures are fatal only with
//! `return_on_writer_error`. A failing quarantiner is reported together with
//! the writer error that triggered it.

use std::time::Instant;

use bytes::Bytes;
use groundlink_telemetry::MetricsRecorder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::alloc::BufferPool;
use crate::error::{PipelineError, WriteError};
use crate::io::{Quarantiner, Reader, Writer};

pub const DEFAULT_POOL_CAPACITY: usize = 4;

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Instance name used in logs and metric labels.
    pub name: String,
    pub buffer_size: usize,
    pub pool_capacity: usize,
    /// Stop on the first writer error instead of quarantining and continuing.
    pub return_on_writer_error: bool,
    /// Report an observed cancellation as [`PipelineError::Cancelled`].
    pub return_context_error: bool,
    /// Skip the quarantiner for cancellation-class writer errors.
    pub ignore_context_error: bool,
}

impl ProcessorConfig {
    pub fn new(name: impl Into<String>, buffer_size: usize) -> Self {
        Self {
            name: name.into(),
            buffer_size,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            return_on_writer_error: false,
            return_context_error: false,
            ignore_context_error: false,
        }
    }

    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub fn with_return_on_writer_error(mut self, enabled: bool) -> Self {
        self.return_on_writer_error = enabled;
        self
    }

    pub fn with_return_context_error(mut self, enabled: bool) -> Self {
        self.return_context_error = enabled;
        self
    }

    pub fn with_ignore_context_error(mut self, enabled: bool) -> Self {
        self.ignore_context_error = enabled;
        self
    }
}

/// A processor is `Running` only while inside [`Processor::start`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProcessorState {
    Running,
    Stopped,
}

pub struct Processor {
    config: ProcessorConfig,
    pool: BufferPool,
    reader: Box<dyn Reader>,
    writer: Box<dyn Writer>,
    quarantiner: Box<dyn Quarantiner>,
    metrics: Option<MetricsRecorder>,
    state: ProcessorState,
    writer_closed: bool,
}

impl Processor {
    pub fn new(
        config: ProcessorConfig,
        reader: Box<dyn Reader>,
        writer: Box<dyn Writer>,
        quarantiner: Box<dyn Quarantiner>,
    ) -> Self {
        let pool = BufferPool::new(config.buffer_size, config.pool_capacity);
        Self {
            config,
            pool,
            reader,
            writer,
            quarantiner,
            metrics: None,
            state: ProcessorState::Stopped,
            writer_closed: false,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Runs the loop until cancellation, an exhausted reader, or a fatal error.
    pub async fn start(&mut self, cancel: &CancellationToken) -> Result<(), PipelineError> {
        self.state = ProcessorState::Running;
        let span = info_span!("processor", pipeline = %self.config.name);
        let result = self.run(cancel).instrument(span).await;
        self.state = ProcessorState::Stopped;
        result
    }

    async fn run(&mut self, cancel: &CancellationToken) -> Result<(), PipelineError> {
        info!("Processor started");
        loop {
            if cancel.is_cancelled() {
                if self.config.return_context_error {
                    warn!("Processor stopped by cancellation");
                    return Err(PipelineError::Cancelled);
                }
                info!("Processor stopped by cancellation");
                return Ok(());
            }

            let msg = {
                let mut buf = self.pool.checkout();
                let n = self.reader.read(cancel, &mut buf).await.map_err(|e| {
                    error!(error = %e, "Reader failed, stopping processor");
                    PipelineError::Reader(e)
                })?;

                if n == 0 {
                    if self.reader.is_closed() {
                        info!("Reader exhausted, processor stopped");
                        return Ok(());
                    }
                    continue;
                }
                Bytes::copy_from_slice(&buf[..n])
            };

            if let Some(metrics) = &self.metrics {
                metrics.inc_read(&self.config.name);
            }

            let started = Instant::now();
            match self.writer.write(cancel, msg.clone()).await {
                Ok(_) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_written(&self.config.name);
                        metrics
                            .observe_write_latency(&self.config.name, started.elapsed().as_secs_f64());
                    }
                }
                Err(write_error) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_write_failure(&self.config.name);
                    }
                    let err = self.route_write_failure(cancel, &msg, write_error).await;
                    if self.config.return_on_writer_error {
                        error!(error = %err, "Writer failed, stopping processor");
                        return Err(err);
                    }
                    warn!(error = %err, "Writer failed, continuing with next message");
                }
            }
        }
    }

    async fn route_write_failure(
        &mut self,
        cancel: &CancellationToken,
        msg: &[u8],
        write_error: WriteError,
    ) -> PipelineError {
        if self.config.ignore_context_error && write_error.is_cancellation() {
            debug!(error = %write_error, "Not quarantining cancelled write");
            return PipelineError::Writer(write_error);
        }

        match self.quarantiner.quarantine(cancel, msg, &write_error).await {
            Ok(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.inc_quarantined(&self.config.name);
                }
                PipelineError::Writer(write_error)
            }
            Err(quarantine) => PipelineError::Quarantine {
                write: write_error,
                quarantine,
            },
        }
    }

    /// Closes the writer. Only the first call reaches it.
    pub async fn close(&mut self) -> Result<(), PipelineError> {
        if self.writer_closed {
            return Ok(());
        }
        self.writer_closed = true;
        self.writer.close().await.map_err(|e| {
            error!(pipeline = %self.config.name, error = %e, "Failed to close writer");
            PipelineError::Writer(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::error::{QuarantineError, ReadError};

    enum Step {
        Msg(&'static [u8]),
        Idle,
        Fail,
    }

    struct ScriptedReader {
        steps: VecDeque<Step>,
        closed: bool,
    }

    impl ScriptedReader {
        fn new(steps: Vec<Step>) -> Box<Self> {
            Box::new(Self {
                steps: steps.into(),
                closed: false,
            })
        }
    }

    #[async_trait]
    impl Reader for ScriptedReader {
        async fn read(
            &mut self,
            _cancel: &CancellationToken,
            buf: &mut [u8],
        ) -> Result<usize, ReadError> {
            match self.steps.pop_front() {
                Some(Step::Msg(data)) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                Some(Step::Idle) => Ok(0),
                Some(Step::Fail) => Err(ReadError::Io(std::io::Error::other("link down"))),
                None => {
                    self.closed = true;
                    Ok(0)
                }
            }
        }

        fn is_closed(&self) -> bool {
            self.closed
        }
    }

    #[derive(Default)]
    struct Recorded {
        written: Vec<Vec<u8>>,
        quarantined: Vec<Vec<u8>>,
        closes: usize,
    }

    type Shared = Arc<Mutex<Recorded>>;

    /// Rejects any message starting with `!`, or every message with `Cancelled`
    /// when `cancelled` is set.
    struct RecordingWriter {
        log: Shared,
        cancelled: bool,
    }

    #[async_trait]
    impl Writer for RecordingWriter {
        async fn write(
            &mut self,
            _cancel: &CancellationToken,
            msg: Bytes,
        ) -> Result<usize, WriteError> {
            if self.cancelled {
                return Err(WriteError::Cancelled);
            }
            if msg.starts_with(b"!") {
                return Err(WriteError::malformed("poisoned"));
            }
            self.log.lock().written.push(msg.to_vec());
            Ok(msg.len())
        }

        async fn close(&mut self) -> Result<(), WriteError> {
            self.log.lock().closes += 1;
            Ok(())
        }
    }

    struct RecordingQuarantiner {
        log: Shared,
        fail: bool,
    }

    #[async_trait]
    impl Quarantiner for RecordingQuarantiner {
        async fn quarantine(
            &mut self,
            _cancel: &CancellationToken,
            msg: &[u8],
            _cause: &WriteError,
        ) -> Result<usize, QuarantineError> {
            if self.fail {
                return Err(QuarantineError::Other("quarantine offline".into()));
            }
            self.log.lock().quarantined.push(msg.to_vec());
            Ok(msg.len())
        }
    }

    struct Harness {
        log: Shared,
        cancelled_writes: bool,
        failing_quarantine: bool,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                log: Shared::default(),
                cancelled_writes: false,
                failing_quarantine: false,
            }
        }

        fn processor(&self, config: ProcessorConfig, steps: Vec<Step>) -> Processor {
            Processor::new(
                config,
                ScriptedReader::new(steps),
                Box::new(RecordingWriter {
                    log: self.log.clone(),
                    cancelled: self.cancelled_writes,
                }),
                Box::new(RecordingQuarantiner {
                    log: self.log.clone(),
                    fail: self.failing_quarantine,
                }),
            )
        }
    }

    fn config() -> ProcessorConfig {
        ProcessorConfig::new("test", 32)
    }

    #[tokio::test]
    async fn test_drains_until_reader_exhausted() {
        let harness = Harness::new();
        let mut processor = harness.processor(
            config(),
            vec![Step::Msg(b"a"), Step::Idle, Step::Msg(b"bb"), Step::Msg(b"ccc")],
        );
        assert_eq!(processor.state(), ProcessorState::Stopped);

        processor.start(&CancellationToken::new()).await.unwrap();
        assert_eq!(processor.state(), ProcessorState::Stopped);

        let log = harness.log.lock();
        assert_eq!(log.written, vec![b"a".to_vec(), b"bb".to_vec(), b"ccc".to_vec()]);
        assert!(log.quarantined.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_message_is_contained() {
        let harness = Harness::new();
        let mut processor = harness.processor(
            config(),
            vec![Step::Msg(b"ok1"), Step::Msg(b"!bad"), Step::Msg(b"ok2")],
        );

        processor.start(&CancellationToken::new()).await.unwrap();

        let log = harness.log.lock();
        assert_eq!(log.written, vec![b"ok1".to_vec(), b"ok2".to_vec()]);
        assert_eq!(log.quarantined, vec![b"!bad".to_vec()]);
    }

    #[tokio::test]
    async fn test_return_on_writer_error_stops() {
        let harness = Harness::new();
        let mut processor = harness.processor(
            config().with_return_on_writer_error(true),
            vec![Step::Msg(b"!bad"), Step::Msg(b"never")],
        );

        let err = processor.start(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Writer(WriteError::Malformed(_))));

        let log = harness.log.lock();
        assert!(log.written.is_empty());
        assert_eq!(log.quarantined, vec![b"!bad".to_vec()]);
    }

    #[tokio::test]
    async fn test_quarantine_failure_is_compound() {
        let mut harness = Harness::new();
        harness.failing_quarantine = true;
        let mut processor = harness.processor(
            config().with_return_on_writer_error(true),
            vec![Step::Msg(b"!bad")],
        );

        let err = processor.start(&CancellationToken::new()).await.unwrap_err();
        match err {
            PipelineError::Quarantine { write, quarantine } => {
                assert!(matches!(write, WriteError::Malformed(_)));
                assert!(matches!(quarantine, QuarantineError::Other(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_reader_failure_is_fatal_and_close_is_safe() {
        let harness = Harness::new();
        let mut processor =
            harness.processor(config(), vec![Step::Msg(b"first"), Step::Fail, Step::Msg(b"x")]);

        let err = processor.start(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Reader(ReadError::Io(_))));
        assert_eq!(processor.state(), ProcessorState::Stopped);

        processor.close().await.unwrap();
        processor.close().await.unwrap();
        let log = harness.log.lock();
        assert_eq!(log.written, vec![b"first".to_vec()]);
        assert_eq!(log.closes, 1);
    }

    #[tokio::test]
    async fn test_cancellation_outcome_follows_config() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let harness = Harness::new();
        let mut quiet = harness.processor(config(), vec![Step::Msg(b"unread")]);
        assert!(quiet.start(&cancel).await.is_ok());

        let mut loud = harness.processor(
            config().with_return_context_error(true),
            vec![Step::Msg(b"unread")],
        );
        assert!(matches!(
            loud.start(&cancel).await,
            Err(PipelineError::Cancelled)
        ));
        assert!(harness.log.lock().written.is_empty());
    }

    #[tokio::test]
    async fn test_return_context_error_does_not_make_writes_fatal() {
        let harness = Harness::new();
        let mut processor = harness.processor(
            config().with_return_context_error(true),
            vec![Step::Msg(b"!bad"), Step::Msg(b"good")],
        );

        processor.start(&CancellationToken::new()).await.unwrap();
        assert_eq!(harness.log.lock().written, vec![b"good".to_vec()]);
    }

    #[tokio::test]
    async fn test_ignore_context_error_skips_quarantine() {
        let mut harness = Harness::new();
        harness.cancelled_writes = true;

        let mut skipping = harness.processor(
            config().with_ignore_context_error(true),
            vec![Step::Msg(b"dropped")],
        );
        skipping.start(&CancellationToken::new()).await.unwrap();
        assert!(harness.log.lock().quarantined.is_empty());

        let mut routing = harness.processor(config(), vec![Step::Msg(b"routed")]);
        routing.start(&CancellationToken::new()).await.unwrap();
        assert_eq!(harness.log.lock().quarantined, vec![b"routed".to_vec()]);
    }

    #[tokio::test]
    async fn test_buffers_return_to_pool() {
        let harness = Harness::new();
        let mut processor = harness.processor(
            config().with_pool_capacity(2),
            vec![Step::Msg(b"a"), Step::Msg(b"!b"), Step::Fail],
        );

        let _ = processor.start(&CancellationToken::new()).await;
        assert_eq!(processor.pool().available(), 2);
        assert_eq!(processor.pool().stats().outstanding(), 0);
        assert_eq!(processor.pool().stats().allocations(), 0);
    }

    #[tokio::test]
    async fn test_metrics_recorded_per_pipeline() {
        let harness = Harness::new();
        let metrics = MetricsRecorder::new().unwrap();
        let mut processor = harness
            .processor(config(), vec![Step::Msg(b"ok"), Step::Msg(b"!bad")])
            .with_metrics(metrics.clone());

        processor.start(&CancellationToken::new()).await.unwrap();
        assert_eq!(metrics.messages_read.with_label_values(&["test"]).get(), 2);
        assert_eq!(metrics.messages_written.with_label_values(&["test"]).get(), 1);
        assert_eq!(metrics.write_failures.with_label_values(&["test"]).get(), 1);
        assert_eq!(
            metrics.messages_quarantined.with_label_values(&["test"]).get(),
            1
        );
    }
}
