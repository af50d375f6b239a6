//! File-based cache implementation.
//!
//! [`FileCache`] stores each key as a single file under its root directory.
//! Values are written to a sibling temporary file and renamed into place, so
//! a concurrent reader sees either the old or the new value, never a torn one.
//!
//! On construction, [`FileCache`] checks the `VERSION` file in the cache root.
//! A root holding another version is wiped and recreated; a root without one
//! is initialized in place.

use std::fs;
use std::path::{Path, PathBuf};

use crate::CacheStore;

const VERSION_FILE: &str = "VERSION";

/// File-based [`CacheStore`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION            # contains the cache version string
/// +-- _bbforge_parser    # one file per key
/// +-- _bbforge_renderer
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    /// Root directory of this cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.root.join(key)).ok()
    }

    fn put(&self, key: &str, value: &[u8]) {
        let path = self.root.join(key);

        // Cache is optional, errors only get logged
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::debug!(key = %key, error = %e, "Failed to create cache directory");
            return;
        }

        let tmp = path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp, value) {
            tracing::debug!(key = %key, error = %e, "Failed to write cache entry");
            return;
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            tracing::debug!(key = %key, error = %e, "Failed to move cache entry into place");
            let _ = fs::remove_file(&tmp);
        }
    }
}

/// Keep `root` only if its `VERSION` file records `version`.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join(VERSION_FILE);
    let stored = fs::read_to_string(&version_file).ok();
    if stored.as_deref() == Some(version) {
        tracing::debug!(root = %root.display(), version = %version, "Reusing cache");
        return;
    }
    tracing::info!(
        root = %root.display(),
        stored = stored.as_deref().unwrap_or("none"),
        version = %version,
        "Resetting cache"
    );

    if stored.is_some()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!(root = %root.display(), error = %e, "Failed to clear cache");
    }
    let written = fs::create_dir_all(root).and_then(|()| fs::write(&version_file, version));
    if let Err(e) = written {
        tracing::warn!(root = %root.display(), error = %e, "Failed to initialize cache");
    }
}
