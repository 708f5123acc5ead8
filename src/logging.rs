//! Logging setup for dupfind.
//!
//! Uses the `log` facade with an `env_logger` backend writing to stderr, so
//! stdout carries nothing but the report. The level comes from, in order:
//!
//! 1. `RUST_LOG` when set
//! 2. `--quiet` (errors only), `-v` (debug) or `-vv` (trace)
//! 3. Info otherwise
//!
//! Debug builds prefix each record with a timestamp, and with the module
//! path once `-v` is given. Release builds print the level and message only.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupfind::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Install the global logger for the given CLI verbosity.
///
/// Only the first call installs a logger; later calls are ignored.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - Only show errors (ignored when `RUST_LOG` is set)
pub fn init_logging(verbose: u8, quiet: bool) {
    let rust_log = env::var("RUST_LOG").ok();

    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    match rust_log {
        Some(_) => {
            builder.parse_default_env();
        }
        None => {
            builder.filter_level(determine_level(verbose, quiet));
        }
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    match rust_log {
        Some(filter) => log::debug!("Logging configured from RUST_LOG={}", filter),
        None => log::debug!("Logging initialized at level: {}", log::max_level()),
    }
}

/// Map the CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();

        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                timestamp,
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} {}",
                timestamp,
                level,
                record.args()
            )
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });
}
