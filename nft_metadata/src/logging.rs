//! Diagnostic logging setup for the binary.
//!
//! Progress lines are program output and go to stdout; everything emitted
//! through `tracing` goes to stderr, filtered by `NFT_METADATA_LOG`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::Result;

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV: &str = "NFT_METADATA_LOG";

/// Filter applied when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from [`LOG_ENV`], falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`crate::error::NftMetadataError::Logging`] when a global
/// subscriber is already installed.
pub fn init() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
