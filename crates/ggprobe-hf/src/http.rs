//! HTTP backend abstraction for the model host.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing: reqwest in production, an
//! in-memory fake in tests. Every outbound request carries the caller's
//! bearer credential when one is configured.
//!
//! There is no internal retry here: transient failures surface to the
//! caller, which owns retry policy. The configured timeout bounds every
//! request so a fetch that never completes eventually fails.

use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use url::Url;

use crate::config::HfStoreConfig;
use crate::error::{HfError, HfResult};
use crate::models::RangeResponse;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends serving size probes and ranged fetches.
///
/// This is an implementation detail - external code should use the store
/// through the `ModelFileStorePort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Issue a header-only request and report the advertised content length.
    async fn content_length(&self, url: &Url) -> HfResult<Option<u64>>;

    /// Fetch `len` bytes starting at `start`.
    ///
    /// Servers that ignore the range request and answer with the full
    /// resource are reported with `start == 0`; callers slice the body to
    /// the sub-range they asked for.
    async fn fetch_range(&self, url: &Url, start: u64, len: u64) -> HfResult<RangeResponse>;
}

/// Parse a `Content-Range` header value (`bytes <start>-<end>/<total>`).
///
/// Returns the range start and, when the server reported one, the total
/// resource length (`*` totals come back as `None`).
pub(crate) fn parse_content_range(value: &str) -> Option<(u64, Option<u64>)> {
    let rest = value.trim().strip_prefix("bytes")?.trim_start();
    let (range, total) = rest.split_once('/')?;
    let (start, _end) = range.split_once('-')?;
    let start = start.trim().parse().ok()?;
    Some((start, total.trim().parse().ok()))
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    #[must_use]
    pub fn new(config: &HfStoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            auth_token: config.token.clone(),
        }
    }

    /// Build a request with optional authentication.
    fn build_request(&self, method: Method, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, url.as_str());
        if let Some(ref token) = self.auth_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn content_length(&self, url: &Url) -> HfResult<Option<u64>> {
        let response = self.build_request(Method::HEAD, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HfError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok()))
    }

    async fn fetch_range(&self, url: &Url, start: u64, len: u64) -> HfResult<RangeResponse> {
        let end = start + len.saturating_sub(1);
        let response = self
            .build_request(Method::GET, url)
            .header(header::RANGE, format!("bytes={start}-{end}"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HfError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_range = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range);

        let (range_start, total) = if status == StatusCode::PARTIAL_CONTENT {
            content_range.map_or((start, None), |(parsed_start, total)| (parsed_start, total))
        } else {
            // Full-resource answer from a server that ignored the range.
            tracing::debug!(url = %url, "server ignored range request");
            (0, content_range.and_then(|(_, total)| total))
        };

        let body = response.bytes().await?;
        Ok(RangeResponse {
            body,
            start: range_start,
            total,
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! In-memory HTTP backend for tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use url::Url;

    use super::{HfError, HfResult, HttpBackend, RangeResponse};

    #[derive(Clone)]
    struct FakeFile {
        body: Bytes,
        head_length: Option<u64>,
    }

    /// A fake HTTP backend serving canned file bodies.
    ///
    /// Files are matched by URL substring. The backend can simulate servers
    /// that ignore range requests or omit `Content-Range` totals.
    pub struct FakeBackend {
        files: Mutex<HashMap<String, FakeFile>>,
        fetch_log: Mutex<Vec<(u64, u64)>>,
        ignore_range: bool,
        report_total: bool,
    }

    impl FakeBackend {
        /// Create an empty backend.
        #[must_use]
        pub fn new() -> Self {
            Self {
                files: Mutex::new(HashMap::new()),
                fetch_log: Mutex::new(Vec::new()),
                ignore_range: false,
                report_total: true,
            }
        }

        /// Add a file whose HEAD length matches the body length.
        #[must_use]
        pub fn with_file(self, url_contains: &str, body: impl Into<Bytes>) -> Self {
            let body = body.into();
            let head_length = Some(body.len() as u64);
            self.insert(url_contains, body, head_length);
            self
        }

        /// Add a file with an explicit HEAD answer (`None` = no length
        /// header on the HEAD response).
        #[must_use]
        pub fn with_sized_file(
            self,
            url_contains: &str,
            body: impl Into<Bytes>,
            head_length: Option<u64>,
        ) -> Self {
            self.insert(url_contains, body.into(), head_length);
            self
        }

        /// Serve every ranged fetch with the full body from offset zero.
        #[must_use]
        pub const fn with_range_ignored(mut self) -> Self {
            self.ignore_range = true;
            self
        }

        /// Omit totals from range responses.
        #[must_use]
        pub const fn without_content_range(mut self) -> Self {
            self.report_total = false;
            self
        }

        /// Ranges requested so far, in order.
        #[must_use]
        pub fn fetched_ranges(&self) -> Vec<(u64, u64)> {
            self.fetch_log.lock().unwrap().clone()
        }

        fn insert(&self, pattern: &str, body: Bytes, head_length: Option<u64>) {
            self.files
                .lock()
                .unwrap()
                .insert(pattern.to_string(), FakeFile { body, head_length });
        }

        fn find(&self, url: &Url) -> HfResult<FakeFile> {
            let files = self.files.lock().unwrap();
            files
                .iter()
                .find(|(pattern, _)| url.as_str().contains(pattern.as_str()))
                .map(|(_, file)| file.clone())
                .ok_or_else(|| HfError::RequestFailed {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn content_length(&self, url: &Url) -> HfResult<Option<u64>> {
            Ok(self.find(url)?.head_length)
        }

        async fn fetch_range(&self, url: &Url, start: u64, len: u64) -> HfResult<RangeResponse> {
            self.fetch_log.lock().unwrap().push((start, len));
            let file = self.find(url)?;
            let file_len = file.body.len() as u64;

            if self.ignore_range {
                return Ok(RangeResponse {
                    body: file.body,
                    start: 0,
                    total: None,
                });
            }

            let total = self.report_total.then_some(file_len);
            let begin = usize::try_from(start.min(file_len)).unwrap();
            let end = usize::try_from((start.saturating_add(len)).min(file_len)).unwrap();
            Ok(RangeResponse {
                body: file.body.slice(begin..end),
                start,
                total,
            })
        }
    }
}
