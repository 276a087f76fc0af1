//! Cached source reading and content hashing.
//!
//! This crate turns a matched source file into the bytes an asset is emitted
//! with:
//!
//! * [`SourceSignature`] - size and mtime identity of a source file
//! * [`CacheRecord`] - versioned, self-checking cache entry format
//! * [`ContentLoader`] - reads through a [`assetcopy_cache::CacheBackend`],
//!   applying the pattern's transform
//! * [`StatsTracker`] - hit, read and emission counters for a run
//!
//! # Example
//!
//! ```rust,ignore
//! use assetcopy_cache::MemoryCache;
//! use assetcopy_copy::{ContentLoader, StatsTracker, pattern_salt};
//!
//! let cache = MemoryCache::new();
//! let stats = StatsTracker::new();
//! let salt = pattern_salt(&glob_options, None);
//!
//! let loaded = ContentLoader::new(&cache, &stats).load(source, &salt, None)?;
//! println!("{} ({})", loaded.hash, loaded.content.len());
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod loader;
mod progress;
mod record;
mod signature;

pub use error::ContentError;
pub use loader::{ContentLoader, LoadedContent};
pub use progress::{RunStats, StatsTracker};
pub use record::{CacheRecord, RECORD_FORMAT_VERSION, cache_key, pattern_salt};
pub use signature::{ContentHash, SourceSignature};
