//! ## groundlink-core::error
//! **Error types shared by readers, writers, quarantiners and processors**

use thiserror::Error;

/// Boxed error carried by the open-ended variants, so writers can wrap their
/// own decode or storage failures without the core knowing their types.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Reader I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reader failure: {0}")]
    Other(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Write cancelled")]
    Cancelled,

    #[error("Write deadline exceeded")]
    DeadlineExceeded,

    #[error("Hand-off queue closed")]
    QueueClosed,

    #[error("Writer already closed")]
    Closed,

    #[error("Malformed message: {0}")]
    Malformed(#[source] BoxError),

    #[error("Storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl WriteError {
    pub fn malformed(err: impl Into<BoxError>) -> Self {
        WriteError::Malformed(err.into())
    }

    pub fn storage(err: impl Into<BoxError>) -> Self {
        WriteError::Storage(err.into())
    }

    /// Cancellation-class failures: the write was abandoned, not rejected.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, WriteError::Cancelled | WriteError::DeadlineExceeded)
    }
}

#[derive(Debug, Error)]
pub enum QuarantineError {
    #[error("Quarantine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Quarantine failure: {0}")]
    Other(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Reader failure: {0}")]
    Reader(#[from] ReadError),

    #[error("Writer failure: {0}")]
    Writer(#[from] WriteError),

    /// The writer failed and the quarantiner could not take the message either.
    #[error("Quarantine failed ({quarantine}) after writer failure ({write})")]
    Quarantine {
        write: WriteError,
        #[source]
        quarantine: QuarantineError,
    },

    #[error("Pipeline cancelled")]
    Cancelled,

    #[error("Pipeline task aborted: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_class() {
        assert!(WriteError::Cancelled.is_cancellation());
        assert!(WriteError::DeadlineExceeded.is_cancellation());
        assert!(!WriteError::QueueClosed.is_cancellation());
        assert!(!WriteError::malformed("bad frame").is_cancellation());
    }

    #[test]
    fn test_compound_error_reports_both_causes() {
        let err = PipelineError::Quarantine {
            write: WriteError::storage("disk full"),
            quarantine: QuarantineError::Other("sink offline".into()),
        };
        let text = err.to_string();
        assert!(text.contains("disk full"));
        assert!(text.contains("sink offline"));
    }
}
