#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::{
    EstimateState, GroupedFile, MemoryEstimate, ModelHyperparameters, format_human_size,
    kv_cache_bytes,
};
pub use ports::{
    ByteSource, ByteSourceError, GgufDecodeError, HyperparameterDecoderPort, ModelFileStorePort,
    StoreError,
};
pub use services::{
    DEFAULT_CONTEXT_LENGTH, EstimateBatch, EstimateError, EstimateUpdate, MemoryEstimator,
};
pub use utils::group_shard_files;

// Silence unused dev-dependency warnings for crates used only by the
// integration tests under tests/
#[cfg(test)]
use ggprobe_gguf as _;
#[cfg(test)]
use ggprobe_hf as _;
