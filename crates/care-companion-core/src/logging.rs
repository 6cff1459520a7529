//! Logging setup for the host shell.
//!
//! The core only emits `tracing` events; the shell decides whether to install a subscriber.

use tracing_subscriber::EnvFilter;

/// Fallback directive when the requested filter does not parse.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global fmt subscriber with the given `EnvFilter` directives.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(filter: &str) -> bool {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
