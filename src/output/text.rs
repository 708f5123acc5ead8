//! Plain-text console report.
//!
//! # Layout
//!
//! ```text
//! Matching Files:
//! [ /data/a.txt,
//!   /data/b.txt ]
//!
//! -- Stats --
//! Number of files scanned: 4
//! Total data compared: 0.00MB
//! ```
//!
//! One bracketed block per duplicate group, each followed by a blank line.
//! The data volume covers every scanned file, not just the duplicates.

use std::io::{self, Write};

use crate::duplicates::{DuplicateGroup, ScanStats};

/// Text report over a finished scan.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    stats: ScanStats,
}

impl<'a> TextOutput<'a> {
    /// Create a report for the given groups and statistics.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], stats: ScanStats) -> Self {
        Self { groups, stats }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Matching Files:")?;
        for group in self.groups.iter().filter(|g| !g.is_empty()) {
            write_group(writer, group)?;
        }
        write_stats(writer, &self.stats)
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn write_group<W: Write>(writer: &mut W, group: &DuplicateGroup) -> io::Result<()> {
    let last = group.paths.len() - 1;
    for (i, path) in group.paths.iter().enumerate() {
        let lead = if i == 0 { "[ " } else { "  " };
        let tail = if i == last { " ]" } else { "," };
        writeln!(writer, "{}{}{}", lead, path.display(), tail)?;
    }
    writeln!(writer)
}

fn write_stats<W: Write>(writer: &mut W, stats: &ScanStats) -> io::Result<()> {
    writeln!(writer, "-- Stats --")?;
    writeln!(writer, "Number of files scanned: {}", stats.num_files)?;
    writeln!(writer, "Total data compared: {:.2}MB", stats.total_megabytes())
}
