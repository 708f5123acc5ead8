//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting `(path, size)` pairs for duplicate detection.
//! Traversal is lazy and single-threaded: [`walkdir`] keeps an explicit
//! stack of open directories, so deep trees do not grow the call stack.
//!
//! # Features
//!
//! - Deterministic order (children sorted by file name)
//! - Symbolic links are never followed; non-regular files are skipped
//! - Size filtering (min/max) and hidden file filtering
//! - Per-entry errors are yielded without stopping the walk
//!
//! # Example
//!
//! ```no_run
//! use dupfind::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Absolute root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// Relative roots are resolved against the current directory so that
    /// every yielded path is absolute. Symlinks in the root are not resolved.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        let root = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self { root, config }
    }

    /// The absolute root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. A root that does not exist yields exactly one
    /// [`ScanError::NotFound`].
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            })
    }

    /// Turn a walkdir entry into a FileEntry if it is an accepted regular file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping non-regular entry: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walkdir_error(e))),
        };

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileEntry::new(entry.path().to_path_buf(), size)))
    }

    /// Handle walkdir errors.
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::NotFound) => {
                log::debug!("Path not found: {}", path.display());
                ScanError::NotFound(path)
            }
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                ScanError::Io { path, source }
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
