// file: src/logging/logger.rs
// version: 1.0.0
// guid: 3b1c62be-9c74-456a-a122-0b1b835fb9cb

//! Logger initialization and configuration

use crate::Result;
use std::io;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Log output goes to stderr so `--json` output on stdout stays parseable.
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| {
            crate::error::DelegationError::config(format!("Failed to initialize logger: {}", e))
        })?;

    Ok(())
}

/// Run an async operation inside a named tracing span
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    async move { f().await }.instrument(span).await
}
