//! Hyperparameter decoder port.
//!
//! # Design
//!
//! - Domain types (`ModelHyperparameters`) are defined in `domain`
//! - This port only defines the trait and error type
//! - The implementation lives in the `ggprobe-gguf` crate

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ModelHyperparameters;
use crate::ports::byte_source::{ByteSource, ByteSourceError};

/// Errors for streams that are structurally broken.
///
/// The soft "not a decodable model" outcomes (wrong magic, unsupported
/// version, required keys missing) are `Ok(None)` from the port, not
/// errors, so callers can treat the two cases differently.
#[derive(Debug, Error)]
pub enum GgufDecodeError {
    /// A length field exceeded a sanity bound or a value tag was unknown.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// The byte source failed or ended early.
    #[error(transparent)]
    Source(#[from] ByteSourceError),
}

/// Port for decoding attention hyperparameters from a GGUF prefix.
///
/// The same decoder serves local-file and network-streamed inputs; the
/// byte source abstracts the difference away.
#[async_trait]
pub trait HyperparameterDecoderPort: Send + Sync {
    /// Decode hyperparameters from the given source.
    ///
    /// Reads strictly forward and consumes only as much of the stream as
    /// the metadata section requires.
    async fn decode(
        &self,
        source: &mut dyn ByteSource,
    ) -> Result<Option<ModelHyperparameters>, GgufDecodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn HyperparameterDecoderPort>) {}

    #[test]
    fn test_source_error_is_transparent() {
        let err = GgufDecodeError::from(ByteSourceError::UnexpectedEof { position: 7 });
        assert_eq!(err.to_string(), "unexpected end of stream at byte 7");
    }
}
