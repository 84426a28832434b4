//! DTOs for the remote store.

use bytes::Bytes;

// ============================================================================
// Repository Reference
// ============================================================================

/// Reference to a model repository (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HfRepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl HfRepoRef {
    /// Create a new repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a repository reference from a model ID string.
    #[must_use]
    pub fn parse(model_id: &str) -> Option<Self> {
        let parts: Vec<&str> = model_id.splitn(2, '/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self {
                owner: parts[0].to_string(),
                name: parts[1].to_string(),
            })
        } else {
            None
        }
    }

    /// Get the full model ID (owner/name).
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for HfRepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ============================================================================
// Range Response
// ============================================================================

/// Response to one ranged fetch.
#[derive(Debug, Clone)]
pub struct RangeResponse {
    /// Response body.
    pub body: Bytes,
    /// Absolute offset of `body[0]`; zero when the server ignored the
    /// range request and answered with the full resource.
    pub start: u64,
    /// Total resource length from `Content-Range`, when the server sent
    /// one.
    pub total: Option<u64>,
}
