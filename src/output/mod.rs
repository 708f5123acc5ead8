//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Plain text, the default console report
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupfind::duplicates::DuplicateFinder;
//! use dupfind::output::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = TextOutput::new(&groups, summary.stats());
//! output.write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::JsonOutput;
pub use text::TextOutput;
