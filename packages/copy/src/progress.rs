//! Run statistics for content loading and emission.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters of a finished resolve run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Entries served from the cache without reading the source.
    pub cache_hits: u64,
    /// Entries whose source was read from disk.
    pub fresh_reads: u64,
    /// Emission records produced.
    pub emitted: u64,
    /// Entries dropped because their destination was already taken.
    pub skipped: u64,
}

/// Thread-safe statistics tracker using atomics.
#[derive(Debug, Default)]
pub struct StatsTracker {
    cache_hits: AtomicU64,
    fresh_reads: AtomicU64,
    emitted: AtomicU64,
    skipped: AtomicU64,
}

impl StatsTracker {
    /// Create a new tracker with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit.
    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a read from disk.
    pub fn record_read(&self) {
        self.fresh_reads.fetch_add(1, Ordering::SeqCst);
    }

    /// Record an emission.
    pub fn record_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a skipped entry.
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    /// Get a statistics snapshot.
    #[must_use]
    pub fn snapshot(&self) -> RunStats {
        RunStats {
            cache_hits: self.cache_hits.load(Ordering::SeqCst),
            fresh_reads: self.fresh_reads.load(Ordering::SeqCst),
            emitted: self.emitted.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts() {
        let tracker = StatsTracker::new();
        tracker.record_hit();
        tracker.record_hit();
        tracker.record_read();
        tracker.record_emitted();
        tracker.record_skipped();

        assert_eq!(
            tracker.snapshot(),
            RunStats {
                cache_hits: 2,
                fresh_reads: 1,
                emitted: 1,
                skipped: 1,
            }
        );
    }
}
