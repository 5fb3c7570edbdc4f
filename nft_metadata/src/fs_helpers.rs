//! Filesystem helpers shared by both passes.
//!
//! Access goes through `cap-std` directory handles opened from an ambient
//! path once per pass. Symlinks whose targets leave the directory are the one
//! exception and are resolved ambiently.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::config::ListingOrder;
use crate::error::{NftMetadataError, Result};

/// A directory entry as seen by a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// Entry name relative to the listed directory.
    pub name: String,
    /// Whether the entry is a regular file.
    pub is_file: bool,
}

/// Opens an existing directory.
pub fn open_dir(path: &Utf8Path) -> Result<Dir> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| NftMetadataError::io(path, err))
}

/// Opens `path`, creating it and any missing parents first.
pub fn ensure_dir(path: &Utf8Path) -> Result<Dir> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority())
                .map_err(|err| NftMetadataError::io(path, err))?;
            open_dir(path)
        }
        Err(open_err) => Err(NftMetadataError::io(path, open_err)),
    }
}

/// Lists the entries of `dir`, located at `path`, in the requested order.
pub fn list_entries(dir: &Dir, path: &Utf8Path, order: ListingOrder) -> Result<Vec<ListedEntry>> {
    let mut entries = Vec::new();
    for entry_result in dir.read_dir(".").map_err(|err| NftMetadataError::io(path, err))? {
        let entry = entry_result.map_err(|err| NftMetadataError::io(path, err))?;
        let name = entry
            .file_name()
            .map_err(|err| NftMetadataError::io(path, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| NftMetadataError::io(path.join(&name), err))?;
        let is_file = if file_type.is_symlink() {
            resolves_to_file(dir, path, &name)
        } else {
            file_type.is_file()
        };
        entries.push(ListedEntry { name, is_file });
    }

    if order == ListingOrder::Sorted {
        entries.sort_by(|left, right| left.name.cmp(&right.name));
    }
    Ok(entries)
}

/// Follows the symlink `name` and reports whether it ends at a regular file.
///
/// Targets outside `dir` are out of reach of the capability handle, so those
/// are resolved through the ambient path instead. Dangling links are not files.
fn resolves_to_file(dir: &Dir, path: &Utf8Path, name: &str) -> bool {
    match dir.metadata(name) {
        Ok(metadata) => metadata.is_file(),
        Err(err) => {
            tracing::debug!(
                entry = name,
                error = %err,
                "resolving symlink outside directory handle"
            );
            path.join(name).metadata().is_ok_and(|metadata| metadata.is_file())
        }
    }
}

/// Returns the parent directory of `path`, falling back to `"."` when the
/// path has no parent or the parent is empty.
pub fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Reads a UTF-8 file, returning `None` when it does not exist.
pub fn read_optional_file(path: &Utf8Path) -> Result<Option<String>> {
    let Some(file_name) = path.file_name() else {
        return Err(NftMetadataError::io(
            path,
            std::io::Error::other("cannot determine file name"),
        ));
    };
    let parent = match Dir::open_ambient_dir(parent_or_dot(path), ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(NftMetadataError::io(path, err)),
    };
    match parent.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(NftMetadataError::io(path, err)),
    }
}
