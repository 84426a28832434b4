//! URL construction for repository file downloads.

use url::Url;

use crate::error::HfResult;
use crate::models::HfRepoRef;

/// Build the `resolve/` URL serving a repository file's raw bytes.
pub(crate) fn build_resolve_url(
    base_url: &str,
    repo: &HfRepoRef,
    revision: &str,
    file_path: &str,
) -> HfResult<Url> {
    let base = base_url.trim_end_matches('/');
    Ok(Url::parse(&format!(
        "{base}/{}/resolve/{revision}/{file_path}",
        repo.id()
    ))?)
}
