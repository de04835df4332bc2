//! Structured logging for Startie
//!
//! This module sets up tracing-based logging with configurable levels.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Filtering comes from `RUST_LOG` when set, otherwise DEBUG for this crate
/// in debug builds and INFO in release builds.
pub fn init() {
    let default_level = if cfg!(debug_assertions) {
        "startie=debug,info"
    } else {
        "startie=info,warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Initialize logging for tests
///
/// Uses `try_init()` so repeated calls are harmless.
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}
