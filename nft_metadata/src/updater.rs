//! Image URI update pass.
//!
//! Rewrites the `image` field of every `*.json` document in the output
//! directory to `<base_uri>/<name>.<image_extension>`, editing each file in
//! place through a single read-write handle.

use std::io::{Read, Seek, SeekFrom, Write};

use camino::Utf8PathBuf;
use cap_std::fs_utf8::{Dir, OpenOptions};
use serde_json::{Map, Value};

use crate::config::RunConfig;
use crate::error::{NftMetadataError, Result};
use crate::fs_helpers::{list_entries, open_dir};
use crate::record::{image_uri, to_pretty_json};
use crate::report::{Pass, PassReport};

/// Suffix an entry needs for the updater to touch it.
pub const JSON_SUFFIX: &str = ".json";

/// Stamps the image URI into every metadata document in `config.jsons_dir`.
///
/// Entries whose names do not end in `.json` are listed but never opened.
/// Fields other than `image` keep their values and order.
///
/// # Errors
///
/// Returns [`NftMetadataError::Io`] when the directory cannot be opened or
/// listed. Per-document failures ([`NftMetadataError::Parse`],
/// [`NftMetadataError::MissingName`], I/O) stop the pass under `fail-fast`
/// and are collected into the report under `keep-going`.
pub fn update_image_uris<W: Write>(config: &RunConfig, progress: &mut W) -> Result<PassReport> {
    let _span = tracing::info_span!(
        "update",
        jsons_dir = %config.jsons_dir,
        base_uri = %config.base_uri
    )
    .entered();

    let dir = open_dir(&config.jsons_dir)?;
    let entries = list_entries(&dir, &config.jsons_dir, config.listing_order)?;

    let mut report = PassReport::new(Pass::Update);
    for entry in entries {
        if !entry.name.ends_with(JSON_SUFFIX) {
            tracing::debug!(entry = %entry.name, "ignoring non-JSON entry");
            report.record_skipped(entry.name);
            continue;
        }

        match stamp_document(&dir, config, &entry.name) {
            Ok(path) => {
                writeln!(progress, "Updated image URI in metadata JSON file: {path}")
                    .map_err(NftMetadataError::Progress)?;
                report.record_written(path);
            }
            Err(err) => report.absorb(config.failure_policy, &entry.name, err)?,
        }
    }

    tracing::info!(
        updated = report.written().len(),
        skipped = report.skipped().len(),
        failed = report.failures().len(),
        "image URI update finished"
    );
    Ok(report)
}

fn stamp_document(dir: &Dir, config: &RunConfig, file_name: &str) -> Result<Utf8PathBuf> {
    let path = config.jsons_dir.join(file_name);
    let mut file = dir
        .open_with(file_name, OpenOptions::new().read(true).write(true))
        .map_err(|err| NftMetadataError::io(path.clone(), err))?;

    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|err| NftMetadataError::io(path.clone(), err))?;
    let mut document: Map<String, Value> =
        serde_json::from_str(&text).map_err(|err| NftMetadataError::Parse {
            path: path.clone(),
            source: err,
        })?;

    let uri = match document.get("name") {
        Some(Value::String(name)) => image_uri(&config.base_uri, name, &config.image_extension),
        Some(_) => return Err(NftMetadataError::InvalidName(path)),
        None => return Err(NftMetadataError::MissingName(path)),
    };
    tracing::debug!(path = %path, image = %uri, "stamping image URI");
    document.insert(String::from("image"), Value::String(uri));

    let payload = to_pretty_json(&document).map_err(|err| NftMetadataError::Serialize {
        path: path.clone(),
        source: err,
    })?;
    rewrite_in_place(&mut file, &payload).map_err(|err| NftMetadataError::io(path.clone(), err))?;
    Ok(path)
}

fn rewrite_in_place(file: &mut cap_std::fs_utf8::File, payload: &[u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.write_all(payload)?;
    let len = u64::try_from(payload.len()).map_err(std::io::Error::other)?;
    file.set_len(len)
}
