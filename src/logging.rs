//! Subscriber setup for binaries and tests that embed iodine
//!
//! The library only emits `tracing` events. Installing a subscriber is the
//! host application's choice; [`init`] is provided for the common case.

use crate::config::LoggingConfig;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` plus the configured level
///
/// An unparsable level falls back to INFO. Returns `false` when a global
/// subscriber was already installed, in which case nothing changes.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(config.level.parse().unwrap_or_else(|_| {
            tracing::Level::INFO.into()
        }));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.level, "iodine logging initialized");
    }
    installed
}
