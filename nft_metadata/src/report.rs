//! Per-pass outcome tracking.
//!
//! A [`PassReport`] records what a pass wrote, what it skipped, and, under
//! the `keep-going` policy, which entries failed.

use std::fmt;

use camino::Utf8PathBuf;

use crate::config::FailurePolicy;
use crate::error::{NftMetadataError, Result};

/// Identifies one of the two passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// The metadata generator.
    Generate,
    /// The image URI updater.
    Update,
}

impl Pass {
    /// Returns the CLI-friendly name of this pass.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry that failed while the pass kept going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Directory entry name the failure belongs to.
    pub entry: String,
    /// Rendered error message.
    pub reason: String,
}

/// Summary of a completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pass: Pass,
    written: Vec<Utf8PathBuf>,
    skipped: Vec<String>,
    failures: Vec<EntryFailure>,
}

impl PassReport {
    /// Creates an empty report for `pass`.
    #[must_use]
    pub const fn new(pass: Pass) -> Self {
        Self {
            pass,
            written: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns the pass this report describes.
    #[must_use]
    pub const fn pass(&self) -> Pass {
        self.pass
    }

    /// Documents written by the pass, in processing order.
    #[must_use]
    pub fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }

    /// Entries the pass listed but did not process.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Entries that failed under the `keep-going` policy.
    #[must_use]
    pub fn failures(&self) -> &[EntryFailure] {
        &self.failures
    }

    pub(crate) fn record_written(&mut self, path: Utf8PathBuf) {
        self.written.push(path);
    }

    pub(crate) fn record_skipped(&mut self, entry: String) {
        self.skipped.push(entry);
    }

    /// Routes a per-entry error through `policy`.
    ///
    /// Under `fail-fast` the error is returned unchanged. Under `keep-going`
    /// it is logged and recorded, and the pass continues.
    pub(crate) fn absorb(
        &mut self,
        policy: FailurePolicy,
        entry: &str,
        err: NftMetadataError,
    ) -> Result<()> {
        match policy {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::KeepGoing => {
                tracing::warn!(pass = %self.pass, entry, error = %err, "entry failed; continuing");
                self.failures.push(EntryFailure {
                    entry: entry.to_owned(),
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }

    /// Converts a report with recorded failures into an error.
    ///
    /// # Errors
    ///
    /// Returns [`NftMetadataError::PartialFailure`] when any entry failed.
    pub fn into_result(self) -> Result<Self> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        Err(NftMetadataError::PartialFailure {
            pass: self.pass,
            failed: self.failures.len(),
            attempted: self.failures.len() + self.written.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Tests for failure routing and pass summaries.

    use super::*;
    use rstest::rstest;

    fn sample_error() -> NftMetadataError {
        NftMetadataError::MissingName(Utf8PathBuf::from("jsons/3.json"))
    }

    #[rstest]
    fn fail_fast_returns_the_error() {
        let mut report = PassReport::new(Pass::Update);
        let outcome = report.absorb(FailurePolicy::FailFast, "3.json", sample_error());
        assert!(matches!(outcome, Err(NftMetadataError::MissingName(_))));
        assert!(report.failures().is_empty());
    }

    #[rstest]
    fn keep_going_records_and_summarises() {
        let mut report = PassReport::new(Pass::Update);
        report.record_written(Utf8PathBuf::from("jsons/0.json"));
        let outcome = report.absorb(FailurePolicy::KeepGoing, "3.json", sample_error());
        assert!(outcome.is_ok());
        assert_eq!(report.failures().len(), 1);

        let summary = report.into_result();
        assert!(matches!(
            summary,
            Err(NftMetadataError::PartialFailure {
                pass: Pass::Update,
                failed: 1,
                attempted: 2,
            })
        ));
    }

    #[rstest]
    fn clean_report_passes_through() {
        let report = PassReport::new(Pass::Generate);
        assert!(report.into_result().is_ok());
    }
}
