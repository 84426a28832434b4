//! Port definitions: the seams between the core and its adapters.
//!
//! Ports only define traits and domain-facing error types. Implementations
//! live in `ggprobe-gguf` (decoder, local byte sources) and `ggprobe-hf`
//! (remote store, lazy range reader).

mod byte_source;
mod decoder;
mod model_store;

pub use byte_source::{ByteSource, ByteSourceError};
pub use decoder::{GgufDecodeError, HyperparameterDecoderPort};
pub use model_store::{ModelFileStorePort, StoreError};
