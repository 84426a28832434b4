//! Memory estimation service.
//!
//! Combines per-shard size probes, the prefix decoder, and the KV-cache
//! arithmetic into per-artifact estimates. Every failure collapses to "no
//! estimate" at this boundary, never a crash; the selection UI keeps
//! working with the other rows' estimates.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{EstimateState, GroupedFile, MemoryEstimate, kv_cache_bytes};
use crate::ports::{GgufDecodeError, HyperparameterDecoderPort, ModelFileStorePort, StoreError};

/// Context length used when the caller does not specify one.
pub const DEFAULT_CONTEXT_LENGTH: u32 = 16_384;

/// Why an estimate could not be produced.
///
/// Collapsed to `None` by [`MemoryEstimator::estimate`]; kept distinct here
/// so callers that care (e.g. a validation tool) can tell a corrupt file
/// from one that simply is not a model.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Size probe or reader opening failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stream was corrupt or ended early while decoding.
    #[error(transparent)]
    Decode(#[from] GgufDecodeError),

    /// The first shard is not a decodable GGUF model.
    #[error("not a decodable model file")]
    NotAModel,
}

/// Completed state for one list row.
#[derive(Debug, Clone)]
pub struct EstimateUpdate {
    /// Index of the artifact in the submitted list.
    pub index: usize,
    /// Final state; `Pending` never appears here.
    pub state: EstimateState,
}

/// Handle over a batch of in-flight estimate tasks.
#[derive(Debug)]
pub struct EstimateBatch {
    handles: Vec<JoinHandle<()>>,
}

impl EstimateBatch {
    /// Abort every in-flight estimate, e.g. when the selection moves on.
    ///
    /// Tasks stop at their next suspension point; no shared state exists
    /// to corrupt.
    pub fn abort_all(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// Number of tasks in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the batch contains no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Derives memory estimates for grouped model artifacts.
pub struct MemoryEstimator {
    store: Arc<dyn ModelFileStorePort>,
    decoder: Arc<dyn HyperparameterDecoderPort>,
}

impl MemoryEstimator {
    /// Create an estimator over the given store and decoder.
    #[must_use]
    pub fn new(
        store: Arc<dyn ModelFileStorePort>,
        decoder: Arc<dyn HyperparameterDecoderPort>,
    ) -> Self {
        Self { store, decoder }
    }

    /// Estimate memory for one artifact, collapsing failures to `None`.
    pub async fn estimate(
        &self,
        file: &GroupedFile,
        context_length: u32,
    ) -> Option<MemoryEstimate> {
        match self.estimate_checked(file, context_length).await {
            Ok(estimate) => Some(estimate),
            Err(err) => {
                tracing::debug!(file = %file.display_name, error = %err, "estimate unavailable");
                None
            }
        }
    }

    /// Estimate memory for one artifact, preserving the failure taxonomy.
    pub async fn estimate_checked(
        &self,
        file: &GroupedFile,
        context_length: u32,
    ) -> Result<MemoryEstimate, EstimateError> {
        let mut model_bytes: u64 = 0;
        for part in &file.part_files {
            model_bytes = model_bytes.saturating_add(self.store.file_size(part).await?);
        }

        let mut source = self.store.open(&file.actual_name).await?;
        let params = self
            .decoder
            .decode(source.as_mut())
            .await?
            .ok_or(EstimateError::NotAModel)?;

        Ok(MemoryEstimate::new(
            model_bytes,
            kv_cache_bytes(&params, context_length),
        ))
    }

    /// Spawn one independently-cancellable estimate task per artifact.
    ///
    /// Each task sends a single [`EstimateUpdate`] for its index when it
    /// completes; a row stays [`EstimateState::Pending`] until its update
    /// arrives. There is no ordering guarantee across rows. Every task owns
    /// its byte source and connection, so aborting the batch mid-flight
    /// cannot corrupt anything shared.
    #[must_use]
    pub fn spawn_estimates(
        self: &Arc<Self>,
        files: &[GroupedFile],
        context_length: u32,
    ) -> (mpsc::Receiver<EstimateUpdate>, EstimateBatch) {
        let (tx, rx) = mpsc::channel(files.len().max(1));
        let mut handles = Vec::with_capacity(files.len());

        for (index, file) in files.iter().cloned().enumerate() {
            let estimator = Arc::clone(self);
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let state = match estimator.estimate(&file, context_length).await {
                    Some(estimate) => EstimateState::Ready(estimate),
                    None => EstimateState::Unavailable,
                };
                // The consumer may have discarded stale requests already;
                // a dropped update is fine.
                let _ = tx.send(EstimateUpdate { index, state }).await;
            }));
        }

        (rx, EstimateBatch { handles })
    }
}
