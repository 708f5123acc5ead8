//! dupfind - duplicate file finder
//!
//! Walks a directory tree, buckets regular files by size and compares
//! same-size files byte for byte with a growing read schedule. Files proven
//! identical are reported in groups, followed by scan statistics.
//!
//! The stages are usable on their own:
//!
//! - [`scanner::Walker`] yields `(path, size)` entries in a stable order
//! - [`duplicates::SizeIndex`] buckets them by size
//! - [`duplicates::Comparator`] decides byte equality of two files
//! - [`duplicates::group_bucket`] partitions one bucket into groups
//! - [`output::TextOutput`] and [`output::JsonOutput`] format the result

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;

use cli::{Cli, OutputFormat};
use config::Config;
use duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig, ScanSummary};
use error::ExitCode;
use output::{JsonOutput, TextOutput};
use progress::Progress;

/// Run a scan as described by the parsed command line.
///
/// A root that does not exist (or is not a directory) is reported on
/// stderr; the empty report is still printed and [`ExitCode::GeneralError`]
/// is returned.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .apply_cli(&cli)
        .context("Invalid command-line options")?;

    let mut finder_config = FinderConfig::default()
        .with_walker_config(config.walker_config())
        .with_schedule(config.buffer_schedule.clone());
    if !cli.quiet && cli.output == OutputFormat::Text {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary, exit_code) = match finder.find_duplicates(&cli.root) {
        Ok((groups, summary)) => (groups, summary, ExitCode::Success),
        Err(e) => {
            eprintln!("[{}] Error: {}", ExitCode::GeneralError.code_prefix(), e);
            (Vec::new(), ScanSummary::default(), ExitCode::GeneralError)
        }
    };

    if summary.has_errors() {
        log::warn!(
            "{} entries could not be walked, {} comparisons failed to open a file",
            summary.scan_errors.len(),
            summary.open_failures + summary.read_failures
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_report(&mut out, cli.output, &groups, &summary, exit_code) {
        log::warn!("Failed to write report: {}", e);
    }

    Ok(exit_code)
}

fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    exit_code: ExitCode,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => TextOutput::new(groups, summary.stats()).write_to(out)?,
        OutputFormat::Json => JsonOutput::new(groups, summary, exit_code).write_to(out, true)?,
    }
    out.flush()?;
    Ok(())
}
