//! Model file store port: size probes and reader opening.

use async_trait::async_trait;
use thiserror::Error;

use crate::ports::byte_source::ByteSource;

/// Errors raised by model file stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Neither probe strategy yielded a byte count for the file.
    #[error("size could not be resolved for '{file}'")]
    SizeUnresolvable {
        /// The file whose size stayed unknown.
        file: String,
    },

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),
}

/// Port over one model repository's downloadable files.
///
/// Implementations attach the caller's bearer credential, when present, to
/// every outbound request. Retry policy belongs to the caller; this port
/// does not retry internally.
#[async_trait]
pub trait ModelFileStorePort: Send + Sync {
    /// Resolve a file's total byte size with a lightweight probe.
    async fn file_size(&self, file: &str) -> Result<u64, StoreError>;

    /// Open a forward-only byte source over the file's contents.
    ///
    /// The returned source is owned by exactly one decode operation.
    async fn open(&self, file: &str) -> Result<Box<dyn ByteSource>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn ModelFileStorePort>) {}

    #[test]
    fn test_size_unresolvable_message() {
        let err = StoreError::SizeUnresolvable {
            file: "model.gguf".to_string(),
        };
        assert!(err.to_string().contains("model.gguf"));
    }
}
