//! Persistent key-value cache backends for assetcopy.
//!
//! The copy engine only needs a best-effort `get`/`store` capability over
//! opaque bytes. This crate defines that capability ([`CacheBackend`]) and
//! ships three backends:
//!
//! * [`MemoryCache`] - process-lifetime map, for watch mode and tests
//! * [`FsCache`] - one file per key on disk, written atomically
//! * [`NullCache`] - caching disabled
//!
//! # Example
//!
//! ```rust,ignore
//! use assetcopy_cache::{CacheBackend, FsCache};
//!
//! let cache = FsCache::new(".cache/assetcopy");
//! cache.store("a1b2", b"bytes")?;
//! assert_eq!(cache.get("a1b2")?, Some(b"bytes".to_vec()));
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod fs;
mod memory;

pub use error::CacheError;
pub use fs::FsCache;
pub use memory::MemoryCache;

/// A persistent key-value store for cache entries.
///
/// Implementations must tolerate concurrent `get` and `store` calls. Storing
/// a key that already exists replaces it.
pub trait CacheBackend: Send + Sync {
    /// Fetch the bytes stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// * If the backend is unavailable or the entry cannot be read
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// * If the backend is unavailable or the entry cannot be written
    fn store(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
}

/// A backend that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl CacheBackend for NullCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn store(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }
}
