//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file bucketing ([`SizeIndex`])
//! - Byte-for-byte comparison with a growing buffer schedule ([`Comparator`])
//! - Partitioning same-size buckets into duplicate groups ([`group_bucket`])
//! - Orchestrating the whole pipeline ([`DuplicateFinder`])

pub mod compare;
pub mod finder;
pub mod grouper;
pub mod groups;
pub mod index;

pub use compare::{
    BufferSchedule, CompareError, CompareStats, Comparator, Comparison, ContentEq, ScheduleError,
    DEFAULT_BUFFER_SCHEDULE,
};
pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use grouper::group_bucket;
pub use groups::DuplicateGroup;
pub use index::{ScanStats, SizeIndex, BYTES_PER_MB};
