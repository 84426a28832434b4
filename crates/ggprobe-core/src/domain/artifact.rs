//! Grouped model artifacts.

use serde::{Deserialize, Serialize};

/// One logical model artifact: a standalone file or a merged shard set.
///
/// Invariant: `part_files` is non-empty and ordered by shard index
/// ascending; `actual_name` is always the first entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedFile {
    /// Name shown in selection lists (`<base>.gguf` for shard sets).
    pub display_name: String,
    /// The file to open first; for shard sets, the lowest-indexed part.
    pub actual_name: String,
    /// Declared shard total, absent for standalone files.
    pub part_count: Option<u32>,
    /// All files making up the artifact.
    pub part_files: Vec<String>,
}

impl GroupedFile {
    /// Create a standalone entry for a file outside the shard convention.
    #[must_use]
    pub fn standalone(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            actual_name: name.clone(),
            part_count: None,
            part_files: vec![name],
        }
    }

    /// Whether this artifact is split across multiple physical files.
    #[must_use]
    pub fn is_sharded(&self) -> bool {
        self.part_files.len() > 1
    }
}
