//! Public configuration for the remote model store.

use std::time::Duration;

/// Default hub base URL.
const DEFAULT_BASE_URL: &str = "https://huggingface.co";

/// Fixed chunk size for lazy range fetches.
pub(crate) const DEFAULT_FETCH_CHUNK: u64 = 256 * 1024;

/// Configuration for the remote model file store.
///
/// Use the builder pattern methods to customize the configuration.
///
/// # Example
///
/// ```
/// use ggprobe_hf::HfStoreConfig;
/// use std::time::Duration;
///
/// let config = HfStoreConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_optional_token(std::env::var("HF_TOKEN").ok());
/// ```
#[derive(Debug, Clone)]
pub struct HfStoreConfig {
    /// Base URL of the model host
    pub(crate) base_url: String,
    /// Repository revision served by `resolve/` URLs
    pub(crate) revision: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout; a fetch that never completes must eventually fail
    pub(crate) timeout: Duration,
    /// Optional bearer credential for private repositories
    pub(crate) token: Option<String>,
    /// Bytes fetched per ranged request by the lazy reader
    pub(crate) fetch_chunk_size: u64,
}

impl Default for HfStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            revision: "main".to_string(),
            user_agent: concat!("ggprobe-hf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            fetch_chunk_size: DEFAULT_FETCH_CHUNK,
        }
    }
}

impl HfStoreConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the model host.
    ///
    /// Defaults to `https://huggingface.co`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the repository revision. Defaults to `main`.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a bearer credential for accessing private repositories.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional bearer credential.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the chunk size for lazy range fetches.
    ///
    /// Defaults to 256 KiB.
    #[must_use]
    pub const fn with_fetch_chunk_size(mut self, bytes: u64) -> Self {
        self.fetch_chunk_size = bytes;
        self
    }
}
