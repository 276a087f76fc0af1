//! Cached loading of source file content.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use assetcopy_cache::CacheBackend;
use assetcopy_config::Transform;

use crate::error::ContentError;
use crate::progress::StatsTracker;
use crate::record::{CacheRecord, cache_key};
use crate::signature::{ContentHash, SourceSignature};

/// Final bytes of a source file and their hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContent {
    /// Bytes to emit, after any transform.
    pub content: Vec<u8>,
    /// Hash of `content`.
    pub hash: ContentHash,
    /// Whether the source was served from the cache without being read.
    pub from_cache: bool,
}

/// Loads source content through a cache backend.
pub struct ContentLoader<'a> {
    cache: &'a dyn CacheBackend,
    stats: &'a StatsTracker,
}

impl<'a> ContentLoader<'a> {
    /// Create a loader reading through `cache` and counting into `stats`.
    #[must_use]
    pub fn new(cache: &'a dyn CacheBackend, stats: &'a StatsTracker) -> Self {
        Self { cache, stats }
    }

    /// Load the content of `source`.
    ///
    /// A cache record is used when its signature matches the source's
    /// current size and mtime. Otherwise the file is read, and the record is
    /// replaced if the source did not change while being read. Cache backend
    /// failures are logged and treated as misses.
    ///
    /// A transform with a cache key is applied before caching. One without a
    /// key is applied on every load to the cached raw bytes.
    ///
    /// # Arguments
    ///
    /// * `source` - Absolute path of the source file
    /// * `salt` - Pattern salt from [`crate::pattern_salt`]
    /// * `transform` - The pattern's transform, if any
    ///
    /// # Errors
    ///
    /// * [`ContentError::Missing`] if the source disappeared
    /// * [`ContentError::MetadataError`] or [`ContentError::ReadError`] on IO failure
    /// * [`ContentError::TransformError`] if the transform fails
    pub fn load(
        &self,
        source: &Path,
        salt: &str,
        transform: Option<&Transform>,
    ) -> Result<LoadedContent, ContentError> {
        let signature = SourceSignature::read(source)?;
        let key = cache_key(source, salt);

        let cached_transform = transform.filter(|t| t.cache_key.is_some());
        let deferred_transform = transform.filter(|t| t.cache_key.is_none());

        if let Some(record) = self.lookup(&key)
            && record.is_fresh_for(&signature)
        {
            log::trace!("Cache hit for {}", source.display());
            self.stats.record_hit();
            return finish(source, record.content, record.hash, deferred_transform, true);
        }

        log::trace!("Reading {}", source.display());
        let bytes = read_source(source)?;
        self.stats.record_read();

        let content = match cached_transform {
            Some(transform) => apply_transform(transform, &bytes, source)?,
            None => bytes,
        };
        let record = CacheRecord::new(signature, content);

        match SourceSignature::read(source) {
            Ok(after) if after == signature => {
                match self.cache.store(&key, &record.encode()) {
                    Ok(()) => log::trace!("Cached {}", source.display()),
                    Err(e) => log::warn!("Failed to cache {}: {e}", source.display()),
                }
            }
            _ => log::debug!(
                "{} changed while being read, not caching",
                source.display()
            ),
        }

        finish(source, record.content, record.hash, deferred_transform, false)
    }

    fn lookup(&self, key: &str) -> Option<CacheRecord> {
        match self.cache.get(key) {
            Ok(Some(bytes)) => {
                let record = CacheRecord::decode(&bytes);
                if record.is_none() {
                    log::debug!("Discarding unreadable cache entry {key}");
                }
                record
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Cache lookup failed: {e}");
                None
            }
        }
    }
}

fn finish(
    source: &Path,
    content: Vec<u8>,
    hash: ContentHash,
    transform: Option<&Transform>,
    from_cache: bool,
) -> Result<LoadedContent, ContentError> {
    let Some(transform) = transform else {
        return Ok(LoadedContent {
            content,
            hash,
            from_cache,
        });
    };

    let content = apply_transform(transform, &content, source)?;
    Ok(LoadedContent {
        hash: ContentHash::of(&content),
        content,
        from_cache,
    })
}

fn read_source(source: &Path) -> Result<Vec<u8>, ContentError> {
    fs::read(source).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ContentError::Missing {
                path: source.to_path_buf(),
            }
        } else {
            ContentError::ReadError {
                path: source.to_path_buf(),
                io_error: e,
            }
        }
    })
}

fn apply_transform(
    transform: &Transform,
    bytes: &[u8],
    source: &Path,
) -> Result<Vec<u8>, ContentError> {
    (transform.transformer)(bytes, source).map_err(|e| ContentError::TransformError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })
}
