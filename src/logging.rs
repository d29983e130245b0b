//! Logging setup
//!
//! Library code logs through the `tracing` macros; only the binary installs a
//! subscriber.

pub use tracing::{debug, error, info, warn};

use crate::config::LogFormat;

/// Initialize the tracing subscriber with environment filter support.
///
/// `level` is the default filter; `RUST_LOG` takes precedence when set:
///
/// ```bash
/// RUST_LOG=debug selsync tree ~/Sync
/// RUST_LOG=selsync::selection=trace selsync exclude ~/Sync Photos/raw
/// ```
pub fn init_tracing(level: &str, format: LogFormat) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
	// A second init (tests, embedding) keeps the first subscriber
	let _ = match format {
		LogFormat::Pretty => builder.try_init(),
		LogFormat::Compact => builder.compact().try_init(),
	};
}

// vim: ts=4
