//! Key/value cache store for compiled formatter artifacts.
//!
//! The factory persists two records after every regeneration: the compiled
//! parser and the renderer record (generated class name plus the optional
//! censor helper). Both go through the [`CacheStore`] trait so the factory
//! never depends on a concrete backend.
//!
//! # Implementations
//!
//! - [`NullCache`]: No-op store (always misses)
//! - [`MemoryCache`]: In-process map, useful for tests and single-process setups
//! - [`FileCache`]: One file per key with version validation
//!
//! # Example
//!
//! ```
//! use bbforge_cache::{CacheStore, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! cache.put("_parser", b"{}");
//! assert_eq!(cache.get("_parser"), Some(b"{}".to_vec()));
//! assert_eq!(cache.get("_renderer"), None);
//! ```

mod ext;
mod file;
mod memory;

pub use ext::CacheStoreExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// A flat key/value store.
///
/// Writes to different keys are independent: there is no transaction
/// spanning several keys, so a reader may observe one key from an older
/// write and another from a newer one.
pub trait CacheStore: Send + Sync {
    /// Retrieve the value stored under `key`.
    ///
    /// Returns `None` when the key was never written or the backend could
    /// not read it back.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Failures are logged and swallowed; the next `get` simply misses.
    fn put(&self, key: &str, value: &[u8]);
}

/// No-op [`CacheStore`] that never stores or retrieves data.
///
/// Use when caching is disabled. Every `get` returns `None`.
pub struct NullCache;

impl CacheStore for NullCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn put(&self, _key: &str, _value: &[u8]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;

        assert_eq!(cache.get("key"), None);

        cache.put("key", b"hello");
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn test_null_cache_is_object_safe() {
        let caches: Vec<Box<dyn CacheStore>> =
            vec![Box::new(NullCache), Box::new(MemoryCache::new())];

        for cache in &caches {
            cache.put("k", b"v");
        }
        assert_eq!(caches[0].get("k"), None);
        assert_eq!(caches[1].get("k"), Some(b"v".to_vec()));
    }
}
