//! Remote model file store.
//!
//! Implements the core `ModelFileStorePort` over one repository: maps
//! filenames to `resolve/` URLs, resolves shard sizes with lightweight
//! probes, and opens lazy range readers for the decoder.

use std::sync::Arc;

use async_trait::async_trait;
use ggprobe_core::{ByteSource, ModelFileStorePort, StoreError};
use url::Url;

use crate::config::HfStoreConfig;
use crate::error::HfResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::HfRepoRef;
use crate::probe::resolve_file_size;
use crate::range_reader::LazyRangeReader;
use crate::url::build_resolve_url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default store type using the reqwest HTTP backend.
pub type DefaultHfStore = HfModelFileStore<ReqwestBackend>;

// ============================================================================
// Store
// ============================================================================

/// Store over one model repository's downloadable files.
///
/// Generic over an HTTP backend for easy testing; production code uses
/// [`DefaultHfStore`].
pub struct HfModelFileStore<B: HttpBackend> {
    backend: Arc<B>,
    repo: HfRepoRef,
    base_url: String,
    revision: String,
    fetch_chunk_size: u64,
}

impl DefaultHfStore {
    /// Create a store for `repo` with the given configuration.
    #[must_use]
    pub fn new(config: &HfStoreConfig, repo: HfRepoRef) -> Self {
        let backend = Arc::new(ReqwestBackend::new(config));
        Self::from_parts(backend, config, repo)
    }
}

impl<B: HttpBackend> HfModelFileStore<B> {
    /// Create a store with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn with_backend(backend: Arc<B>, config: &HfStoreConfig, repo: HfRepoRef) -> Self {
        Self::from_parts(backend, config, repo)
    }

    fn from_parts(backend: Arc<B>, config: &HfStoreConfig, repo: HfRepoRef) -> Self {
        Self {
            backend,
            repo,
            base_url: config.base_url.clone(),
            revision: config.revision.clone(),
            fetch_chunk_size: config.fetch_chunk_size,
        }
    }

    fn file_url(&self, file: &str) -> HfResult<Url> {
        build_resolve_url(&self.base_url, &self.repo, &self.revision, file)
    }
}

#[async_trait]
impl<B: HttpBackend + 'static> ModelFileStorePort for HfModelFileStore<B> {
    async fn file_size(&self, file: &str) -> Result<u64, StoreError> {
        let url = self.file_url(file).map_err(StoreError::from)?;
        match resolve_file_size(self.backend.as_ref(), &url).await {
            Ok(Some(size)) => Ok(size),
            Ok(None) => Err(StoreError::SizeUnresolvable {
                file: file.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn open(&self, file: &str) -> Result<Box<dyn ByteSource>, StoreError> {
        let url = self.file_url(file).map_err(StoreError::from)?;
        Ok(Box::new(LazyRangeReader::new(
            Arc::clone(&self.backend),
            url,
            self.fetch_chunk_size,
        )))
    }
}
