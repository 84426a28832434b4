//! Domain types: grouped artifacts, hyperparameters, and memory estimates.
//!
//! All of these are short-lived values constructed per estimation request
//! and handed to the consuming UI; nothing here is persisted.

mod artifact;
mod estimate;
mod hyperparameters;

pub use artifact::GroupedFile;
pub use estimate::{EstimateState, MemoryEstimate, format_human_size, kv_cache_bytes};
pub use hyperparameters::ModelHyperparameters;
