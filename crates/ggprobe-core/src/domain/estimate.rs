//! Derived memory estimates and their arithmetic.

use serde::{Deserialize, Serialize};

use crate::domain::hyperparameters::ModelHyperparameters;

/// KV-cache bytes per hidden unit, per layer, per context token.
const KV_CACHE_BYTES_PER_UNIT: f64 = 4.0;

/// A derived memory-footprint estimate for one model artifact.
///
/// Never mutated after construction; recomputed wholesale when the target
/// context length changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEstimate {
    /// Total estimated bytes (model weights + KV cache).
    pub total_bytes: u64,
    /// Summed on-disk size across all shards.
    pub model_bytes: u64,
    /// Estimated key/value cache size at the target context length.
    pub kv_cache_bytes: u64,
    /// Rendered summary for selection lists.
    pub display: String,
}

impl MemoryEstimate {
    /// Combine shard bytes and KV-cache bytes into a finished estimate.
    #[must_use]
    pub fn new(model_bytes: u64, kv_cache_bytes: u64) -> Self {
        let total_bytes = model_bytes.saturating_add(kv_cache_bytes);
        let display = format!(
            "{} (Model: {} + KV: {})",
            format_human_size(total_bytes),
            format_human_size(model_bytes),
            format_human_size(kv_cache_bytes)
        );
        Self {
            total_bytes,
            model_bytes,
            kv_cache_bytes,
            display,
        }
    }
}

/// Per-row estimate lifecycle for a selection list.
///
/// `Pending` is what a UI renders until the row's update arrives;
/// `Unavailable` is the collapsed soft-failure outcome and must be shown
/// distinctly from `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateState {
    /// No probe or decode has completed yet.
    Pending,
    /// The estimate is ready for display.
    Ready(MemoryEstimate),
    /// No estimate could be produced for this file.
    Unavailable,
}

impl EstimateState {
    /// Whether the row is still waiting for its result.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Estimated key/value cache bytes at a target context length.
///
/// A constant-factor approximation over the attention hyperparameters, not
/// an exact accounting of quantized cache formats.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kv_cache_bytes(params: &ModelHyperparameters, context_length: u32) -> u64 {
    let bytes = KV_CACHE_BYTES_PER_UNIT
        * params.hidden_size as f64
        * f64::from(params.hidden_layers)
        * f64::from(context_length);
    bytes as u64
}

/// Render a byte count the way selection lists display it.
///
/// Values of at least 1,000,000,000 bytes render as gigabytes with one
/// decimal place; everything below renders as whole megabytes.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_human_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
    } else {
        format!("{} MB", (bytes as f64 / 1_000_000.0).round() as u64)
    }
}
