//! Error types for `nft-metadata`.
//!
//! Every failure the two passes can hit is funnelled into
//! [`NftMetadataError`] so the binary reports one diagnostic and exits
//! non-zero.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::report::Pass;

/// Errors surfaced by the metadata generation and URI update passes.
#[derive(Debug, Error)]
pub enum NftMetadataError {
    /// Layered configuration could not be merged or deserialised.
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Box<figment::Error>),

    /// A configuration file was named explicitly but does not exist.
    #[error("configuration file not found at {0}")]
    MissingConfigFile(Utf8PathBuf),

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path the operation was acting on.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A metadata document did not parse as a JSON object.
    #[error("failed to parse metadata JSON at {path}: {source}")]
    Parse {
        /// Document being parsed.
        path: Utf8PathBuf,
        /// Underlying parser failure.
        #[source]
        source: serde_json::Error,
    },

    /// A metadata document lacks the `name` key.
    #[error("metadata JSON at {0} has no `name` field")]
    MissingName(Utf8PathBuf),

    /// A metadata document carries a `name` that is not a string.
    #[error("metadata JSON at {0} has a `name` field that is not a string")]
    InvalidName(Utf8PathBuf),

    /// A metadata document could not be serialised.
    #[error("failed to serialise metadata for {path}: {source}")]
    Serialize {
        /// Destination of the document.
        path: Utf8PathBuf,
        /// Underlying serialiser failure.
        #[source]
        source: serde_json::Error,
    },

    /// Writing a progress line to the console failed.
    #[error("failed to write progress output: {0}")]
    Progress(#[source] std::io::Error),

    /// One or more entries failed while running under `keep-going`.
    #[error("{pass} pass failed for {failed} of {attempted} entries")]
    PartialFailure {
        /// Pass that reported the failures.
        pass: Pass,
        /// Number of entries that failed.
        failed: usize,
        /// Number of entries the pass attempted.
        attempted: usize,
    },

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl NftMetadataError {
    /// Builds an [`NftMetadataError::Io`] for `path`.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results produced by this crate.
pub type Result<T, E = NftMetadataError> = std::result::Result<T, E>;
