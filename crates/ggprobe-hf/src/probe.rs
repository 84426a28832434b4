//! Lightweight remote size probes.
//!
//! A file's total size is resolved without downloading it: a header-only
//! request first, then a single-byte ranged fetch whose `Content-Range`
//! carries the total.

use url::Url;

use crate::error::HfResult;
use crate::http::HttpBackend;

/// Resolve a remote file's total byte size.
///
/// Returns `Ok(None)` when neither strategy yields a usable length; the
/// caller turns that into its unresolvable-size outcome.
pub(crate) async fn resolve_file_size<B: HttpBackend + ?Sized>(
    backend: &B,
    url: &Url,
) -> HfResult<Option<u64>> {
    match backend.content_length(url).await {
        Ok(Some(length)) if length > 0 => return Ok(Some(length)),
        Ok(_) => {}
        Err(err) => {
            tracing::debug!(url = %url, error = %err, "header size probe failed, trying ranged probe");
        }
    }

    let response = backend.fetch_range(url, 0, 1).await?;
    Ok(response.total)
}
