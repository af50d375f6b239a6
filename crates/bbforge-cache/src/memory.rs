//! In-memory cache store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::CacheStore;

/// [`CacheStore`] backed by a process-local map.
///
/// Cloning values out on every `get` keeps the lock hold time short.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether `key` is present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &[u8]) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.to_owned(), value.to_vec());
            }
            Err(_) => tracing::debug!(key = %key, "Memory cache lock poisoned, dropping write"),
        }
    }
}
