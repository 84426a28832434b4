//! Attention hyperparameters decoded from a GGUF metadata prefix.

use serde::{Deserialize, Serialize};

/// The model hyperparameters needed for a memory estimate.
///
/// All four fields are required for a successful decode; a
/// partially-populated set is never produced. `kv_heads` falls back to
/// `attention_heads` when the grouped-query-attention key is absent from
/// the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHyperparameters {
    /// Embedding width (`embedding_length`).
    pub hidden_size: u64,
    /// Attention head count (`attention.head_count`).
    pub attention_heads: u32,
    /// Key/value head count (`attention.head_count_kv`, defaulted).
    pub kv_heads: u32,
    /// Transformer block count (`block_count`).
    pub hidden_layers: u32,
}

impl ModelHyperparameters {
    /// Whether the model uses grouped-query attention.
    #[must_use]
    pub const fn uses_grouped_query_attention(&self) -> bool {
        self.kv_heads != self.attention_heads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_query_attention_detection() {
        let mha = ModelHyperparameters {
            hidden_size: 4096,
            attention_heads: 32,
            kv_heads: 32,
            hidden_layers: 32,
        };
        assert!(!mha.uses_grouped_query_attention());

        let gqa = ModelHyperparameters { kv_heads: 8, ..mha };
        assert!(gqa.uses_grouped_query_attention());
    }
}
