use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller supplied a malformed or inverted time window.
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::InvalidRange(_))
    }
}
