// litevault/src/logger.rs
//! `env_logger` setup for the binary.
//!
//! `RUST_LOG` is honoured unless a level is forced by `--debug` or `--quiet`.
//! Everything goes to stderr so stdout stays clean for redacted output.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger. Safe to call more than once; later calls
/// are ignored.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.target(Target::Stderr);
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}
