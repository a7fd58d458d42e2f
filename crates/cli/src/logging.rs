//! Logging setup. Logs go to stderr so stdout carries only the result line.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging, filtered by `RUST_LOG` (default `info`).
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
