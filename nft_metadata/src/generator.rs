//! Metadata generation pass.
//!
//! Writes one `<index>.json` document per source directory entry, numbered
//! by listing position.

use std::io::Write;

use camino::Utf8PathBuf;
use cap_std::fs_utf8::{Dir, OpenOptions};

use crate::config::RunConfig;
use crate::error::{NftMetadataError, Result};
use crate::fs_helpers::{ensure_dir, list_entries, open_dir};
use crate::record::{MetadataRecord, to_pretty_json};
use crate::report::{Pass, PassReport};

/// Generates a metadata document for every entry in `config.images_dir`.
///
/// The output directory is created when missing. Existing documents with the
/// same index are overwritten. One progress line per written document goes
/// to `progress`.
///
/// # Errors
///
/// Returns [`NftMetadataError::Io`] when either directory cannot be opened or
/// listed. Per-entry failures are returned immediately under the `fail-fast`
/// policy and collected into the report under `keep-going`.
pub fn generate_metadata<W: Write>(config: &RunConfig, progress: &mut W) -> Result<PassReport> {
    let _span = tracing::info_span!(
        "generate",
        images_dir = %config.images_dir,
        jsons_dir = %config.jsons_dir
    )
    .entered();

    let source_dir = open_dir(&config.images_dir)?;
    let entries = list_entries(&source_dir, &config.images_dir, config.listing_order)?;
    let out_dir = ensure_dir(&config.jsons_dir)?;

    let mut report = PassReport::new(Pass::Generate);
    let mut index = 0_usize;
    for entry in entries {
        if config.skip_non_files && !entry.is_file {
            tracing::debug!(entry = %entry.name, "skipping non-file entry");
            report.record_skipped(entry.name);
            continue;
        }

        let file_name = format!("{index}.json");
        index += 1;
        match write_record(&out_dir, config, &entry.name, &file_name) {
            Ok(path) => {
                writeln!(progress, "Generated metadata JSON file: {path}")
                    .map_err(NftMetadataError::Progress)?;
                report.record_written(path);
            }
            Err(err) => report.absorb(config.failure_policy, &entry.name, err)?,
        }
    }

    tracing::info!(
        written = report.written().len(),
        skipped = report.skipped().len(),
        failed = report.failures().len(),
        "metadata generation finished"
    );
    Ok(report)
}

fn write_record(
    out_dir: &Dir,
    config: &RunConfig,
    entry_name: &str,
    file_name: &str,
) -> Result<Utf8PathBuf> {
    let path = config.jsons_dir.join(file_name);
    let record = MetadataRecord::for_file(entry_name);
    let payload = to_pretty_json(&record).map_err(|err| NftMetadataError::Serialize {
        path: path.clone(),
        source: err,
    })?;

    let mut file = out_dir
        .open_with(
            file_name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|err| NftMetadataError::io(path.clone(), err))?;
    file.write_all(&payload)
        .map_err(|err| NftMetadataError::io(path.clone(), err))?;

    tracing::debug!(entry = entry_name, path = %path, name = %record.name, "wrote metadata");
    Ok(path)
}
