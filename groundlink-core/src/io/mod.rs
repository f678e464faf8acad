//! ## groundlink-core::io
//! **Pluggable pipeline endpoints**
//!
//! A processor is assembled from three capabilities:
//! - [`Reader`]: fills a caller-provided buffer with one message
//! - [`Writer`]: consumes one message
//! - [`Quarantiner`]: takes messages the writer rejected
//!
//! Every call receives the pipeline's cancellation token and must return
//! promptly once it fires.

pub mod channel;
pub mod quarantine;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::error::{QuarantineError, ReadError, WriteError};

pub use channel::{handoff, ChannelReader, ChannelWriter, DEFAULT_READ_TIMEOUT};
pub use quarantine::LogQuarantiner;

#[async_trait]
pub trait Reader: Send {
    /// Reads one message into `buf` and returns its length.
    ///
    /// `Ok(0)` means nothing arrived (idle timeout, cancellation, or an
    /// exhausted source); it is never an error.
    async fn read(&mut self, cancel: &CancellationToken, buf: &mut [u8])
        -> Result<usize, ReadError>;

    /// True once the source is exhausted and every later read would return 0.
    fn is_closed(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait Writer: Send {
    /// Consumes one message. The bytes are owned by the writer and no longer
    /// alias any pooled read buffer.
    async fn write(&mut self, cancel: &CancellationToken, msg: Bytes)
        -> Result<usize, WriteError>;

    /// Releases the writer. Calling it more than once is harmless.
    async fn close(&mut self) -> Result<(), WriteError>;
}

#[async_trait]
pub trait Quarantiner: Send {
    async fn quarantine(
        &mut self,
        cancel: &CancellationToken,
        msg: &[u8],
        cause: &WriteError,
    ) -> Result<usize, QuarantineError>;
}
