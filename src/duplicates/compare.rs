//! Byte-for-byte file comparison with a growing buffer schedule.
//!
//! # Overview
//!
//! Two same-size files are compared in *passes*. Each pass reads up to the
//! scheduled number of bytes from both sides and compares the blocks. The
//! schedule starts tiny, since files that differ usually differ near the
//! start, and ramps up quickly for files that keep matching so that large
//! identical files are read with few syscalls.
//!
//! | Pass | Default size |
//! |------|--------------|
//! | 1    | 64 B         |
//! | 2    | 255 B        |
//! | 3    | 4 KiB        |
//! | 4    | 64 KiB - 1   |
//! | 5    | 16 MiB       |
//! | 6+   | 256 MiB      |
//!
//! Only the bytes actually read in a pass are compared. A short read on one
//! side only (a length mismatch) is a difference.
//!
//! # Example
//!
//! ```
//! use dupfind::duplicates::{BufferSchedule, Comparator};
//!
//! let comparator = Comparator::new(BufferSchedule::default());
//! let result = comparator
//!     .compare_readers(&b"hello"[..], &b"hello"[..], Some(5))
//!     .unwrap();
//! assert!(result.equal);
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Default pass sizes in bytes.
pub const DEFAULT_BUFFER_SCHEDULE: [usize; 6] = [64, 255, 4096, 65535, 16_777_216, 268_435_456];

/// Errors raised when building a [`BufferSchedule`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The schedule has no entries.
    #[error("buffer schedule must contain at least one size")]
    Empty,

    /// A pass size of zero would never make progress.
    #[error("buffer schedule entry {index} is zero")]
    ZeroSize {
        /// Position of the offending entry
        index: usize,
    },
}

/// Ordered pass sizes used by the [`Comparator`].
///
/// Passes past the end of the schedule reuse the last size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct BufferSchedule(Vec<usize>);

impl BufferSchedule {
    /// Build a schedule from explicit pass sizes.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if `sizes` is empty or contains a zero.
    pub fn new(sizes: Vec<usize>) -> Result<Self, ScheduleError> {
        if sizes.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if let Some(index) = sizes.iter().position(|&s| s == 0) {
            return Err(ScheduleError::ZeroSize { index });
        }
        Ok(Self(sizes))
    }

    /// Size of the given zero-based pass.
    #[must_use]
    pub fn pass_size(&self, pass: usize) -> usize {
        // Non-empty by construction.
        self.0.get(pass).or(self.0.last()).copied().unwrap_or(1)
    }

    /// The configured sizes.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.0
    }
}

impl Default for BufferSchedule {
    fn default() -> Self {
        Self(DEFAULT_BUFFER_SCHEDULE.to_vec())
    }
}

impl TryFrom<Vec<usize>> for BufferSchedule {
    type Error = ScheduleError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl From<BufferSchedule> for Vec<usize> {
    fn from(schedule: BufferSchedule) -> Self {
        schedule.0
    }
}

/// Outcome of comparing two streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Whether the two streams had identical contents
    pub equal: bool,
    /// Number of passes run before the outcome was known
    pub passes: usize,
    /// Bytes consumed from the longer side
    pub bytes_read: u64,
}

/// Errors that can occur while comparing two files.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// One of the files could not be opened.
    #[error("Could not open {path}: {source}")]
    FileOpen {
        /// Path that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading failed part way through a comparison.
    #[error("Read failed while comparing {a} and {b}: {source}")]
    Read {
        /// First file of the pair
        a: PathBuf,
        /// Second file of the pair
        b: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Content equality between two paths.
///
/// The grouper only depends on this trait, so it can be driven by the
/// on-disk [`Comparator`] or by any in-memory stand-in.
pub trait ContentEq {
    /// Whether the two files have identical contents.
    fn equal(&mut self, a: &Path, b: &Path) -> bool;
}

impl<F> ContentEq for F
where
    F: FnMut(&Path, &Path) -> bool,
{
    fn equal(&mut self, a: &Path, b: &Path) -> bool {
        self(a, b)
    }
}

/// Counters accumulated over every comparison a [`Comparator`] ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareStats {
    /// Pairs compared
    pub comparisons: usize,
    /// Pairs found identical
    pub matches: usize,
    /// Bytes read from disk, summed over both sides
    pub bytes_read: u64,
    /// Pairs abandoned because a file could not be opened
    pub open_failures: usize,
    /// Pairs abandoned because of a read error
    pub read_failures: usize,
}

/// Byte comparator driven by a [`BufferSchedule`].
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    schedule: BufferSchedule,
    stats: CompareStats,
}

impl Comparator {
    /// Create a comparator with the given schedule.
    #[must_use]
    pub fn new(schedule: BufferSchedule) -> Self {
        Self {
            schedule,
            stats: CompareStats::default(),
        }
    }

    /// The schedule in use.
    #[must_use]
    pub fn schedule(&self) -> &BufferSchedule {
        &self.schedule
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> CompareStats {
        self.stats
    }

    /// Compare two files on disk.
    ///
    /// Both handles are owned by this call and closed before it returns.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::FileOpen`] if either file cannot be opened
    /// and [`CompareError::Read`] if reading fails part way through.
    pub fn compare_files(&mut self, a: &Path, b: &Path) -> Result<Comparison, CompareError> {
        let open = |path: &Path| {
            File::open(path).map_err(|source| CompareError::FileOpen {
                path: path.to_path_buf(),
                source,
            })
        };
        let file_a = open(a)?;
        let file_b = open(b)?;

        // Lengths are only a hint for buffer sizing; the pass loop decides.
        let len_hint = match (file_a.metadata(), file_b.metadata()) {
            (Ok(ma), Ok(mb)) => Some(ma.len().max(mb.len())),
            _ => None,
        };

        let result = self
            .compare_readers(file_a, file_b, len_hint)
            .map_err(|source| CompareError::Read {
                a: a.to_path_buf(),
                b: b.to_path_buf(),
                source,
            })?;

        self.stats.bytes_read += result.bytes_read * 2;
        Ok(result)
    }

    /// Compare two readers pass by pass.
    ///
    /// `len_hint` is the expected stream length; when given, pass buffers
    /// are capped just above it so small inputs never allocate the large
    /// schedule entries.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from either reader other than `Interrupted`.
    pub fn compare_readers<A: Read, B: Read>(
        &self,
        mut a: A,
        mut b: B,
        len_hint: Option<u64>,
    ) -> io::Result<Comparison> {
        let cap = len_hint.map(|len| usize::try_from(len).map_or(usize::MAX, |l| l.saturating_add(1)));
        let mut block_a = Vec::new();
        let mut block_b = Vec::new();
        let mut result = Comparison::default();

        let mut pass = 0;
        loop {
            let size = cap.map_or(self.schedule.pass_size(pass), |cap| {
                self.schedule.pass_size(pass).min(cap)
            });
            if block_a.len() < size {
                block_a.resize(size, 0);
                block_b.resize(size, 0);
            }

            let read_a = read_up_to(&mut a, &mut block_a[..size])?;
            let read_b = read_up_to(&mut b, &mut block_b[..size])?;
            result.passes = pass + 1;
            result.bytes_read += read_a.max(read_b) as u64;

            if read_a != read_b || block_a[..read_a] != block_b[..read_b] {
                log::trace!("Mismatch in pass {} ({} byte block)", result.passes, size);
                return Ok(result);
            }

            // A short fill on both sides means both reached end-of-stream.
            if read_a < size {
                result.equal = true;
                return Ok(result);
            }
            pass += 1;
        }
    }
}

impl ContentEq for Comparator {
    fn equal(&mut self, a: &Path, b: &Path) -> bool {
        self.stats.comparisons += 1;
        match self.compare_files(a, b) {
            Ok(result) => {
                log::trace!(
                    "Compared {} and {}: equal={} after {} passes",
                    a.display(),
                    b.display(),
                    result.equal,
                    result.passes
                );
                if result.equal {
                    self.stats.matches += 1;
                }
                result.equal
            }
            Err(e @ CompareError::FileOpen { .. }) => {
                log::warn!("{}", e);
                self.stats.open_failures += 1;
                false
            }
            Err(e @ CompareError::Read { .. }) => {
                log::warn!("{}", e);
                self.stats.read_failures += 1;
                false
            }
        }
    }
}

/// Fill `buf` from `reader` until it is full or the reader is exhausted.
///
/// Returns the number of bytes placed in `buf`.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
