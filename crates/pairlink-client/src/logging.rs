//! Logging bootstrap for host shells.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber. Call once at startup; respects
/// `RUST_LOG`, with a crate-scoped default otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("pairlink_client=debug,pairlink_store=info,pairlink_sync=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
