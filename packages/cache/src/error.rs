//! Error types for cache backends.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur inside a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// IO error while reading or writing an entry.
    #[error("Cache IO error at {}: {source}", path.display())]
    Io {
        /// Path of the entry or directory involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend's storage.
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}
