//! Component discovery.

use indexmap::IndexSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recursively collect every regular file beneath `roots` whose extension is
/// one of `extensions`.
///
/// A root may itself be a file, in which case it is returned when its
/// extension matches. Symbolic links are followed. Entries are sorted by file
/// name within each directory, so the result is stable for a given tree. A
/// file reached through overlapping roots is listed once, at its first position.
pub fn locate(roots: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = IndexSet::new();
    for root in roots {
        if !root.exists() {
            return Err(Error::filesystem(
                root,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "component root does not exist",
                ),
            ));
        }

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root.as_path()).to_path_buf();
                Error::filesystem(&path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if has_extension(entry.path(), extensions) {
                files.insert(entry.into_path());
            }
        }
    }
    debug!(roots = roots.len(), files = files.len(), "Located component files.");
    Ok(files.into_iter().collect())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}
