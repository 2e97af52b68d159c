//! Subscriber setup for binaries and tests that want warnings on stderr.

use tracing_subscriber::EnvFilter;

/// Env var holding the filter directive, e.g. `PARLANCE_LOG=parlance_core=debug`.
pub const LOG_ENV: &str = "PARLANCE_LOG";

/// Install a `fmt` subscriber filtered by `PARLANCE_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}
