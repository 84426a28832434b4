//! Byte-source port: the decoder's only view of its input.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by byte sources.
#[derive(Debug, Error)]
pub enum ByteSourceError {
    /// The source ran out before satisfying a read.
    #[error("unexpected end of stream at byte {position}")]
    UnexpectedEof {
        /// Stream offset where bytes ran out.
        position: u64,
    },

    /// Local I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Transport-level failure during a remote fetch.
    #[error("network error: {0}")]
    Network(String),

    /// A remote fetch did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),
}

/// A seekable-enough stream of bytes feeding one decode operation.
///
/// Implementations read strictly forward. Each instance is owned by exactly
/// one decode; nothing is shared across concurrent decodes, so no locking
/// is needed anywhere behind this trait.
#[async_trait]
pub trait ByteSource: Send {
    /// Fill `buf` completely or fail with [`ByteSourceError::UnexpectedEof`].
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ByteSourceError>;

    /// Logical cursor position from the start of the stream.
    fn position(&self) -> u64;
}
