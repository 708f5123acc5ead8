//! Scanner module for directory traversal.
//!
//! This module provides functionality for:
//! - Single-threaded, deterministic directory walking using walkdir
//! - Size and hidden-file filtering
//!
//! # Architecture
//!
//! - [`walker`]: Directory traversal and file discovery
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod walker;

use std::path::PathBuf;

pub use walker::Walker;

/// A regular file discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes at the time it was read
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
///
/// The default configuration applies no filtering: every regular file
/// under the root is reported, including empty and hidden ones.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(skip_hidden: bool, min_size: Option<u64>, max_size: Option<u64>) -> Self {
        Self {
            skip_hidden,
            min_size,
            max_size,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}
