//! Diagnostic logging via `tracing`, written to stderr.
//!
//! The comparison report goes to stdout and never passes through here.
//!
//! # Log Levels
//!
//! - `error`: only with `-q`
//! - `warn`: default; ignored schema entries and similar
//! - `info` (`-v`): tables loaded, columns compared, output written
//! - `debug` (`-vv`): per-stage details
//! - `trace` (`-vvv`)

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level for the given `-v` count, or `error` when quiet.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. `RUST_LOG` wins when no flag was given.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    let filter = if verbose == 0 && !quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level))
    } else {
        default_filter(level)
    };

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    // A second init (tests) is harmless.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

/// Our crates at `level`; dependencies stay at warn.
fn default_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    let deps = if level == "error" { "error" } else { "warn" };
    EnvFilter::new(format!(
        "{deps},concord={level},concord_cli={level},concord_io={level},concord_recon={level}"
    ))
}
