// piiguard/src/logger.rs
//! Logger setup for the piiguard binary.
//!
//! Wraps `env_logger`. `RUST_LOG` is honoured unless a level is forced from the
//! command line (`--quiet`, `--debug`). Logs go to stderr so `scan` output on
//! stdout stays machine-readable.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger. Calling it twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stderr).format_timestamp_millis();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    // A logger may already be installed (tests, embedding); keep it.
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to a forced level.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    match (quiet, debug) {
        (true, _) => Some(LevelFilter::Off),
        (_, true) => Some(LevelFilter::Debug),
        _ => None,
    }
}
