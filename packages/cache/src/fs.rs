//! On-disk cache backend.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::CacheBackend;
use crate::error::CacheError;

/// Cache storing one file per key below a directory.
///
/// Entries are sharded by the first two characters of the key. Writes go to a
/// temporary file in the shard directory that is then renamed over the entry,
/// so readers never observe a partially written entry.
#[derive(Debug, Clone)]
pub struct FsCache {
    root: PathBuf,
}

impl FsCache {
    /// Create a cache rooted at `root`. The directory is created on first store.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = key.len() >= 2
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(&key[..2]).join(key))
    }
}

impl CacheBackend for FsCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key)?;

        match fs::read(&path) {
            Ok(bytes) => {
                log::trace!("Read cache entry {}", path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        let Some(dir) = path.parent() else {
            return Err(CacheError::InvalidKey(key.to_string()));
        };

        fs::create_dir_all(dir).map_err(|e| CacheError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| CacheError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        temp.write_all(value).map_err(|e| CacheError::Io {
            path: temp.path().to_path_buf(),
            source: e,
        })?;

        temp.persist(&path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        log::trace!("Stored cache entry {}", path.display());

        Ok(())
    }
}
