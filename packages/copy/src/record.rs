//! Cache records and cache keys.
//!
//! A record is stored as a magic line carrying the format version, one line
//! of JSON metadata, then the raw content bytes:
//!
//! ```text
//! assetcopy-record 1
//! {"signature":{...},"storedAtSecs":...,"storedAtNanos":...,"hash":"...","contentLength":...}
//! <content bytes>
//! ```
//!
//! The format version is also part of every cache key, so a format change
//! never reads stale entries written by an older layout.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use assetcopy_config::{GlobOptions, Transform};
use filetime::FileTime;
use serde::{Deserialize, Serialize};

use crate::signature::{ContentHash, SourceSignature};

/// Version of the record layout and key derivation.
pub const RECORD_FORMAT_VERSION: u32 = 1;

const MAGIC: &str = "assetcopy-record";

/// Seconds around a store during which a modification cannot be told apart
/// from the one the record saw.
const RACY_WINDOW_SECS: i64 = 2;

/// A source file's cached content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Signature of the source when it was read.
    pub signature: SourceSignature,
    /// When the record was created.
    pub stored_at: FileTime,
    /// Hash of `content`.
    pub hash: ContentHash,
    /// Raw or transformed bytes, depending on the pattern salt.
    pub content: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordHeader {
    signature: SourceSignature,
    stored_at_secs: i64,
    stored_at_nanos: u32,
    hash: ContentHash,
    content_length: usize,
}

impl CacheRecord {
    /// Create a record for `content` read from a source with `signature`, stored now.
    #[must_use]
    pub fn new(signature: SourceSignature, content: Vec<u8>) -> Self {
        Self {
            signature,
            stored_at: FileTime::now(),
            hash: ContentHash::of(&content),
            content,
        }
    }

    /// Whether the record can vouch for a source currently showing `signature`.
    ///
    /// Requires an identical signature, and the source must not have been
    /// modified within [`RACY_WINDOW_SECS`] of the store: a write in that
    /// window may share the recorded mtime while changing the bytes.
    #[must_use]
    pub fn is_fresh_for(&self, signature: &SourceSignature) -> bool {
        if self.signature != *signature {
            return false;
        }

        let trusted_until = FileTime::from_unix_time(
            self.stored_at.unix_seconds() - RACY_WINDOW_SECS,
            self.stored_at.nanoseconds(),
        );

        signature.mtime() < trusted_until
    }

    /// Serialize the record.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let header = RecordHeader {
            signature: self.signature,
            stored_at_secs: self.stored_at.unix_seconds(),
            stored_at_nanos: self.stored_at.nanoseconds(),
            hash: self.hash.clone(),
            content_length: self.content.len(),
        };

        // Serializing plain numbers and strings cannot fail.
        let header = serde_json::to_string(&header).unwrap_or_default();

        let mut out = Vec::with_capacity(MAGIC.len() + header.len() + self.content.len() + 8);
        out.extend_from_slice(format!("{MAGIC} {RECORD_FORMAT_VERSION}\n").as_bytes());
        out.extend_from_slice(header.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(&self.content);
        out
    }

    /// Parse a record. Anything malformed, truncated, from another format
    /// version or failing its hash check yields `None`.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (magic, rest) = split_line(bytes)?;
        if magic != format!("{MAGIC} {RECORD_FORMAT_VERSION}").as_bytes() {
            return None;
        }

        let (header, content) = split_line(rest)?;
        let header: RecordHeader = serde_json::from_slice(header).ok()?;

        if header.content_length != content.len() || ContentHash::of(content) != header.hash {
            return None;
        }

        Some(Self {
            signature: header.signature,
            stored_at: FileTime::from_unix_time(header.stored_at_secs, header.stored_at_nanos),
            hash: header.hash,
            content: content.to_vec(),
        })
    }
}

fn split_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let newline = bytes.iter().position(|&b| b == b'\n')?;
    Some((&bytes[..newline], &bytes[newline + 1..]))
}

/// Salt distinguishing cache entries of patterns that read the same source
/// differently.
///
/// Covers the record format version, the glob options and the transform
/// identity. A transform without a cache key does not contribute: its
/// patterns cache raw bytes and share them.
#[must_use]
pub fn pattern_salt(glob_options: &GlobOptions, transform: Option<&Transform>) -> String {
    let transform = transform
        .and_then(|t| t.cache_key.as_deref())
        .map_or_else(|| "raw".to_string(), |key| format!("transform:{key}"));

    format!(
        "v{RECORD_FORMAT_VERSION}|dot={}|case={}|onlyFiles={}|ignore={}|{transform}",
        glob_options.dot,
        glob_options.case_sensitive,
        glob_options.only_files,
        glob_options.ignore.join("\u{1f}"),
    )
}

/// Cache key of `source` under `salt`.
#[must_use]
pub fn cache_key(source: &Path, salt: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(source.to_string_lossy().as_bytes());
    hasher.update(&[0]);
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize().as_bytes())
}
