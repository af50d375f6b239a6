//! Extension trait for [`CacheStore`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheStore;

/// Typed convenience methods for [`CacheStore`].
///
/// Provides `get_json`/`put_json` for serde-serializable types and
/// `get_string`/`put_string` for UTF-8 strings. Implemented as default
/// methods on an extension trait so that [`CacheStore`] stays object-safe
/// and backends only deal with raw bytes.
///
/// # Example
///
/// ```
/// use bbforge_cache::{CacheStoreExt, MemoryCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct RendererRecord { class: String }
///
/// let cache = MemoryCache::new();
/// cache.put_json("_renderer", &RendererRecord { class: "r_1".into() });
/// let record: Option<RendererRecord> = cache.get_json("_renderer");
/// assert_eq!(record.unwrap().class, "r_1");
/// ```
pub trait CacheStoreExt: CacheStore {
    /// Retrieve a JSON-deserialized value.
    ///
    /// Returns `None` on miss or when the stored bytes do not deserialize
    /// into `T` (a record written by an incompatible version).
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store a value as JSON.
    ///
    /// Logs and does nothing if serialization fails.
    fn put_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.put(key, &bytes),
            Err(e) => tracing::debug!(key = %key, error = %e, "Failed to serialize cache entry"),
        }
    }

    /// Retrieve a cached UTF-8 string.
    fn get_string(&self, key: &str) -> Option<String> {
        let bytes = self.get(key)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value.
    fn put_string(&self, key: &str, value: &str) {
        self.put(key, value.as_bytes());
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}
