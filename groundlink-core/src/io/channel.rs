//! ## groundlink-core::io::channel
//! **Bounded in-process hand-off between pipelines**
//!
//! [`handoff`] returns a connected writer/reader pair. Writes block while the
//! queue is full, which is how a slow downstream pipeline pushes back on the
//! one feeding it. Closing the writer lets the reader drain what is queued and
//! then report itself closed.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{Reader, Writer};
use crate::error::{ReadError, WriteError};

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

pub fn handoff(capacity: usize, read_timeout: Duration) -> (ChannelWriter, ChannelReader) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ChannelWriter { tx: Some(tx) },
        ChannelReader {
            rx,
            read_timeout,
            closed: false,
        },
    )
}

pub struct ChannelWriter {
    tx: Option<mpsc::Sender<Bytes>>,
}

#[async_trait]
impl Writer for ChannelWriter {
    async fn write(&mut self, cancel: &CancellationToken, msg: Bytes) -> Result<usize, WriteError> {
        let tx = self.tx.as_ref().ok_or(WriteError::Closed)?;
        let len = msg.len();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WriteError::Cancelled),
            sent = tx.send(msg) => sent.map(|_| len).map_err(|_| WriteError::QueueClosed),
        }
    }

    async fn close(&mut self) -> Result<(), WriteError> {
        if self.tx.take().is_some() {
            debug!("Hand-off writer closed");
        }
        Ok(())
    }
}

pub struct ChannelReader {
    rx: mpsc::Receiver<Bytes>,
    read_timeout: Duration,
    closed: bool,
}

#[async_trait]
impl Reader for ChannelReader {
    async fn read(
        &mut self,
        cancel: &CancellationToken,
        buf: &mut [u8],
    ) -> Result<usize, ReadError> {
        if self.closed {
            return Ok(0);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(0),
            received = tokio::time::timeout(self.read_timeout, self.rx.recv()) => match received {
                Ok(Some(data)) => {
                    let n = data.len().min(buf.len());
                    if n < data.len() {
                        warn!(
                            message_len = data.len(),
                            buffer_len = buf.len(),
                            "Hand-off message truncated to buffer size"
                        );
                    }
                    buf[..n].copy_from_slice(&data[..n]);
                    Ok(n)
                }
                Ok(None) => {
                    debug!("Hand-off queue drained and closed");
                    self.closed = true;
                    Ok(0)
                }
                Err(_) => Ok(0),
            },
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
