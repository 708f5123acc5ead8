//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     { "size": 5, "files": ["/path/to/a.txt", "/path/to/b.txt"] }
//!   ],
//!   "summary": {
//!     "total_files": 4,
//!     "total_size": 1039,
//!     "total_megabytes": 0.00099,
//!     "candidate_sizes": 1,
//!     "comparisons": 2,
//!     "bytes_compared": 10,
//!     "open_failures": 0,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "scan_errors": 0,
//!     "scan_duration_ms": 3,
//!     "exit_code": 0,
//!     "exit_code_name": "DF000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// File size in bytes
    pub size: u64,
    /// Absolute paths to all duplicate files
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            size: group.size,
            files: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Total size of all scanned files in megabytes (2^20 bytes)
    pub total_megabytes: f64,
    /// Number of sizes shared by two or more files
    pub candidate_sizes: usize,
    /// Number of file pairs compared
    pub comparisons: usize,
    /// Bytes read by the comparator
    pub bytes_compared: u64,
    /// Comparisons abandoned because a file could not be opened
    pub open_failures: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Number of errors met while walking
    pub scan_errors: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            total_megabytes: summary.stats().total_megabytes(),
            candidate_sizes: summary.candidate_sizes,
            comparisons: summary.comparisons,
            bytes_compared: summary.bytes_compared,
            open_failures: summary.open_failures,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_errors: summary.scan_errors.len(),
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use dupfind::duplicates::{DuplicateGroup, ScanSummary};
    /// use dupfind::output::json::JsonOutput;
    /// use dupfind::error::ExitCode;
    /// use std::path::PathBuf;
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     1024,
    ///     vec![PathBuf::from("/file1.txt"), PathBuf::from("/file2.txt")],
    /// )];
    /// let summary = ScanSummary::default();
    ///
    /// let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
    /// assert_eq!(output.duplicates.len(), 1);
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: groups
                .iter()
                .filter(|g| !g.is_empty())
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
