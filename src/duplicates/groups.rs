//! Confirmed duplicate groups.
//!
//! A [`DuplicateGroup`] is the output of the grouping phase: two or more
//! paths from one size bucket that were proven byte-identical.

use serde::Serialize;
use std::path::PathBuf;

/// Confirmed duplicate group of files.
///
/// Paths keep the order in which they were discovered by the walker; the
/// first path is the one every other member was compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// File size in bytes (shared by all files in the group)
    pub size: u64,
    /// Paths of the identical files
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(size: u64, paths: Vec<PathBuf>) -> Self {
        Self { size, paths }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.paths.len() as u64
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Check whether a path is a member of this group.
    #[must_use]
    pub fn contains(&self, path: &std::path::Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}
