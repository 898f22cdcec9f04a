//! On-disk path construction.
//!
//! Layout relative to a parent directory:
//!
//! ```text
//! <parent>/<id>/.info.json   folder
//! <parent>/<id>.json         entry
//! <parent>/<id>.bin          binary
//! ```
//!
//! Every manager builds paths through these helpers so that reads and writes
//! never disagree about where an object lives. Nothing here touches the disk.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, TypesError};
use crate::names::Identifier;

/// Name of the metadata file inside every folder.
pub const INFO_FILE_NAME: &str = ".info.json";
/// Extension of entry files.
pub const ENTRY_SUFFIX: &str = "json";
/// Extension of binary files.
pub const BINARY_SUFFIX: &str = "bin";

/// Join nested-path segments onto the root.
///
/// Segments are used verbatim, but each must name exactly one directory level:
/// empty segments, `.`, `..` and segments containing a separator are rejected.
pub fn resolve<S: AsRef<str>>(root: &Path, segments: &[S]) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in segments {
        let segment = segment.as_ref();
        validate_segment(segment)?;
        path.push(segment);
    }
    Ok(path)
}

/// Join nested-path segments and a final leaf name onto the root.
pub fn build_path<S: AsRef<str>>(root: &Path, segments: &[S], leaf: &str) -> Result<PathBuf> {
    Ok(resolve(root, segments)?.join(leaf))
}

/// Directory of a folder object.
pub fn folder_dir(parent: &Path, id: &Identifier) -> PathBuf {
    parent.join(id.as_str())
}

/// Info file of a folder object, given the folder's directory.
pub fn info_file(folder_dir: &Path) -> PathBuf {
    folder_dir.join(INFO_FILE_NAME)
}

/// File of an entry object.
pub fn entry_file(parent: &Path, id: &Identifier) -> PathBuf {
    parent.join(format!("{id}.{ENTRY_SUFFIX}"))
}

/// File of a binary object.
pub fn binary_file(parent: &Path, id: &Identifier) -> PathBuf {
    parent.join(format!("{id}.{BINARY_SUFFIX}"))
}

fn validate_segment(segment: &str) -> Result<()> {
    let bad = |reason: &str| TypesError::BadSegment {
        segment: segment.to_string(),
        reason: reason.to_string(),
    };
    if segment.is_empty() {
        return Err(bad("segment must not be empty"));
    }
    if segment.contains('/') || segment.contains('\\') {
        return Err(bad("segment must not contain a path separator"));
    }
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(bad("segment must name a single directory")),
    }
}
