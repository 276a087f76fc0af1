//! Source signatures and content hashes.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use filetime::FileTime;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Cheap identity of a source file's current state: its size and modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSignature {
    /// Size in bytes.
    pub size: u64,
    /// Modification time, whole seconds since the unix epoch.
    pub mtime_secs: i64,
    /// Sub-second part of the modification time.
    pub mtime_nanos: u32,
}

impl SourceSignature {
    /// Read the signature of the file at `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// * [`ContentError::Missing`] if the file does not exist
    /// * [`ContentError::MetadataError`] if its metadata cannot be read
    pub fn read(path: &Path) -> Result<Self, ContentError> {
        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ContentError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ContentError::MetadataError {
                    path: path.to_path_buf(),
                    io_error: e,
                }
            }
        })?;

        let mtime = FileTime::from_last_modification_time(&metadata);

        Ok(Self {
            size: metadata.len(),
            mtime_secs: mtime.unix_seconds(),
            mtime_nanos: mtime.nanoseconds(),
        })
    }

    /// The modification time.
    #[must_use]
    pub fn mtime(&self) -> FileTime {
        FileTime::from_unix_time(self.mtime_secs, self.mtime_nanos)
    }
}

/// Hex-encoded BLAKE3 digest of an entry's final bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(bytes).as_bytes()))
    }

    /// The full hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `len` hex characters (the whole digest if shorter).
    #[must_use]
    pub fn prefix(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
