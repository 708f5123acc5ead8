//! Duplicate finder orchestrating the detection pipeline.
//!
//! # Pipeline
//!
//! 1. **Walk** - collect `(path, size)` pairs from the target directory
//! 2. **Index** - bucket paths by exact size; sizes seen twice become candidates
//! 3. **Compare** - for each candidate size (ascending), partition the bucket
//!    into groups of byte-identical files
//!
//! The finder itself holds no mutable state; every run builds a fresh
//! [`SizeIndex`] and [`Comparator`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::compare::{BufferSchedule, Comparator, ContentEq};
use super::grouper::group_bucket;
use super::groups::DuplicateGroup;
use super::index::{ScanStats, SizeIndex};
use crate::progress::ProgressCallback;
use crate::scanner::{ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration (filters)
    pub walker: WalkerConfig,
    /// Pass sizes used by the byte comparator
    pub schedule: BufferSchedule,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker", &self.walker)
            .field("schedule", &self.schedule)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker = config;
        self
    }

    /// Set the comparator buffer schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: BufferSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of sizes shared by two or more files
    pub candidate_sizes: usize,
    /// Number of file pairs compared
    pub comparisons: usize,
    /// Bytes read by the comparator, summed over both files of each pair
    pub bytes_compared: u64,
    /// Comparisons abandoned because a file could not be opened
    pub open_failures: usize,
    /// Comparisons abandoned because of a read error
    pub read_failures: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Duration of the walking phase
    pub walk_duration: Duration,
    /// Duration of the comparison phase
    pub compare_duration: Duration,
    /// Errors encountered while walking
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// File count and byte volume as printed in the report footer.
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        ScanStats {
            num_files: self.total_files,
            total_bytes: self.total_size,
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }

    /// Whether any walk or comparison error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || self.open_failures > 0 || self.read_failures > 0
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Duplicate finder that runs walk, index and compare in sequence.
///
/// # Example
///
/// ```no_run
/// use dupfind::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default());
/// let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate groups", groups.len());
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under the given directory.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the path does not exist or is not a
    /// directory. Errors on individual entries do not abort the scan; they
    /// are collected in [`ScanSummary::scan_errors`].
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if !path.exists() {
            log::debug!("Root directory {} does not exist", path.display());
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        log::info!("Scanning {}", path.display());
        let mut summary = ScanSummary::default();

        let walk_start = Instant::now();
        let index = self.build_index(path, &mut summary.scan_errors);
        summary.walk_duration = walk_start.elapsed();

        let compare_start = Instant::now();
        let mut comparator = Comparator::new(self.config.schedule.clone());
        let groups = self.group_index(&index, &mut comparator);
        summary.compare_duration = compare_start.elapsed();

        let stats = index.stats();
        let compare_stats = comparator.stats();
        summary.total_files = stats.num_files;
        summary.total_size = stats.total_bytes;
        summary.candidate_sizes = index.candidate_count();
        summary.comparisons = compare_stats.comparisons;
        summary.bytes_compared = compare_stats.bytes_read;
        summary.open_failures = compare_stats.open_failures;
        summary.read_failures = compare_stats.read_failures;
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files ({}), {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.total_size_display(),
            summary.duplicate_groups,
            summary.reclaimable_display()
        );
        log::debug!(
            "{} candidate sizes, {} comparisons, {} read while comparing",
            summary.candidate_sizes,
            summary.comparisons,
            ByteSize::b(summary.bytes_compared)
        );

        Ok((groups, summary))
    }

    /// Walk `path` and bucket every discovered file by size.
    ///
    /// Walk errors are logged by the walker and appended to `errors`.
    pub fn build_index(&self, path: &Path, errors: &mut Vec<ScanError>) -> SizeIndex {
        let walker = Walker::new(path, self.config.walker.clone());
        let progress = self.config.progress_callback.as_deref();
        let mut index = SizeIndex::new();
        let mut count = 0;

        if let Some(cb) = progress {
            cb.on_phase_start("walking", 0);
        }

        for result in walker.walk() {
            match result {
                Ok(entry) => {
                    count += 1;
                    if let Some(cb) = progress {
                        cb.on_progress(count, &entry.path.to_string_lossy());
                    }
                    index.record(entry.path, entry.size);
                }
                Err(e) => errors.push(e),
            }
        }

        if let Some(cb) = progress {
            cb.on_phase_end("walking");
        }

        log::debug!(
            "Indexed {} files into {} sizes ({} candidates)",
            count,
            index.all_sizes().count(),
            index.candidate_count()
        );
        index
    }

    /// Group every candidate bucket of `index`, smallest size first.
    pub fn group_index<C>(&self, index: &SizeIndex, comparator: &mut C) -> Vec<DuplicateGroup>
    where
        C: ContentEq + ?Sized,
    {
        let progress = self.config.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start("comparing", index.candidate_count());
        }

        let mut groups = Vec::new();
        for (done, size) in index.candidate_sizes().enumerate() {
            let bucket = index.bucket(size);
            log::trace!("Comparing {} files of {} bytes", bucket.len(), size);

            groups.extend(
                group_bucket(bucket, comparator)
                    .into_iter()
                    .map(|paths| DuplicateGroup::new(size, paths)),
            );

            if let Some(cb) = progress {
                cb.on_progress(done + 1, &format!("{} byte files", size));
            }
        }

        if let Some(cb) = progress {
            cb.on_phase_end("comparing");
        }
        groups
    }
}
