//! Removal of stale generated renderers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;

/// Extension of renderers still being written.
const TEMP_EXTENSION: &str = "tmp";

/// Delete every file in `dir` whose name starts with `prefix`, except `keep`
/// and files still being written.
///
/// Files that disappear before they are deleted count as removed. Other
/// failures are logged and skipped. Returns the removed paths, sorted.
pub(crate) fn sweep(dir: &Path, prefix: &str, keep: &str) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/{}*",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(prefix)
    );
    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(pattern = %pattern, error = %e, "Invalid renderer pattern");
            return Vec::new();
        }
    };

    let mut removed = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e, "Failed to read renderer entry");
                continue;
            }
        };
        if path.file_name().is_some_and(|name| name == keep)
            || path.extension().is_some_and(|ext| ext == TEMP_EXTENSION)
            || !path.is_file()
        {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove renderer");
                continue;
            }
        }
        tracing::info!(path = %path.display(), "Removed stale renderer");
        removed.push(path);
    }
    removed.sort();
    removed
}
