//! Size-based file organization.
//!
//! # Overview
//!
//! The [`SizeIndex`] maps every observed file size to the ordered list of
//! paths with that size. Files with different sizes cannot be duplicates,
//! so only buckets holding two or more paths (the *candidate sizes*) are
//! ever handed to the byte comparator.
//!
//! The index only grows: there is no removal operation, and a size that
//! became a candidate stays one even if its files later turn out to differ.
//!
//! # Example
//!
//! ```
//! use dupfind::duplicates::SizeIndex;
//! use std::path::PathBuf;
//!
//! let mut index = SizeIndex::new();
//! index.record(PathBuf::from("/file1.txt"), 1024);
//! index.record(PathBuf::from("/file2.txt"), 1024);
//! index.record(PathBuf::from("/file3.txt"), 2048);
//!
//! assert_eq!(index.candidate_sizes().collect::<Vec<_>>(), vec![1024]);
//! assert_eq!(index.stats().num_files, 3);
//! ```

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::scanner::FileEntry;

/// Bytes in one megabyte as reported by the stats footer.
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Mapping from file size to the paths observed with that size.
#[derive(Debug, Clone, Default)]
pub struct SizeIndex {
    buckets: BTreeMap<u64, Vec<PathBuf>>,
    candidates: BTreeSet<u64>,
}

impl SizeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to the bucket for `size`.
    ///
    /// The size becomes a candidate when its bucket receives a second path.
    pub fn record(&mut self, path: PathBuf, size: u64) {
        let bucket = self.buckets.entry(size).or_default();
        bucket.push(path);
        if bucket.len() == 2 {
            log::trace!("Size {} is now a candidate", size);
            self.candidates.insert(size);
        }
    }

    /// Paths recorded with the given size, in discovery order.
    #[must_use]
    pub fn bucket(&self, size: u64) -> &[PathBuf] {
        self.buckets.get(&size).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every observed size, ascending.
    pub fn all_sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.keys().copied()
    }

    /// Sizes shared by two or more files, ascending.
    pub fn candidate_sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.candidates.iter().copied()
    }

    /// Number of candidate sizes.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Check whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// File count and byte volume over every bucket, duplicates or not.
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        self.buckets
            .iter()
            .fold(ScanStats::default(), |mut stats, (size, paths)| {
                stats.num_files += paths.len();
                stats.total_bytes += size * paths.len() as u64;
                stats
            })
    }
}

impl Extend<FileEntry> for SizeIndex {
    fn extend<T: IntoIterator<Item = FileEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.record(entry.path, entry.size);
        }
    }
}

impl FromIterator<FileEntry> for SizeIndex {
    fn from_iter<T: IntoIterator<Item = FileEntry>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

/// Aggregate statistics over everything the walker discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Total number of regular files recorded
    pub num_files: usize,
    /// Sum of the sizes of all recorded files
    pub total_bytes: u64,
}

impl ScanStats {
    /// Total volume in megabytes (2^20 bytes).
    #[must_use]
    pub fn total_megabytes(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }
}
