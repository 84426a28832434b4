#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod decoder;
mod format;
mod reader;
mod source;

// =============================================================================
// Public API: Decoder + byte sources (minimal surface)
// =============================================================================

/// The GGUF prefix decoder implementation.
pub use decoder::{GgufPrefixDecoder, decode_prefix};

/// Format constants and value-type tags.
pub use format::{GGUF_MAGIC, GGUF_VERSION_MAX, GgufValueType, MAX_METADATA_KEY_LEN};

/// Local-file and in-memory byte sources.
pub use source::{FileSource, MemorySource};

// Re-export domain types and ports from core for convenience
pub use ggprobe_core::{
    ByteSource, ByteSourceError, GgufDecodeError, HyperparameterDecoderPort, ModelHyperparameters,
};
