//! Logging utilities
//!
//! Provides logging setup for the `kvfs` binary.

use env_logger::Env;

/// Setup logging. `RUST_LOG` wins over the verbosity flag when set.
pub fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}
