//! Internal error types for remote store operations.
//!
//! These errors are internal to `ggprobe-hf` and are mapped to the core
//! port errors at the boundary.

use ggprobe_core::{ByteSourceError, StoreError};
use thiserror::Error;

/// Result type alias for remote store operations.
pub type HfResult<T> = Result<T, HfError>;

/// Errors raised while talking to the model host.
#[derive(Debug, Error)]
pub enum HfError {
    /// Request failed with an HTTP error status.
    #[error("request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HfError {
    fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(err) if err.is_timeout())
    }
}

impl From<HfError> for StoreError {
    fn from(err: HfError) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<HfError> for ByteSourceError {
    fn from(err: HfError) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
