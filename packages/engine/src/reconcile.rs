//! Merging resolved entries into the run's emission set.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use assetcopy_copy::{ContentHash, StatsTracker};
use serde::Serialize;

use crate::error::Warning;
use crate::host::AssetStore;

const RESERVED_INFO_KEYS: [&str; 3] = ["copied", "immutable", "sourceFilename"];

/// A matched entry with its content and destination resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Declaration index of the pattern.
    pub pattern_index: usize,
    /// Whether the pattern overwrites existing destinations.
    pub force: bool,
    /// Absolute source path.
    pub source: PathBuf,
    /// Source path relative to the run's base context, `/`-separated.
    pub source_filename: String,
    /// Output-relative destination, `/`-separated.
    pub destination: String,
    /// Whether the destination encodes the content hash.
    pub immutable: bool,
    /// Final bytes.
    pub content: Vec<u8>,
    /// Hash of `content`.
    pub hash: ContentHash,
    /// Extra metadata from the pattern.
    pub info: BTreeMap<String, serde_json::Value>,
}

/// Metadata attached to an emitted asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    /// Always `true` for assets emitted by the copy engine.
    pub copied: bool,
    /// Whether the destination encodes the content hash.
    pub immutable: bool,
    /// Source path relative to the run's base context.
    pub source_filename: String,
    /// Extra metadata from the pattern.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// An asset handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionRecord {
    /// Output-relative destination, unique within a run.
    pub destination: String,
    /// Absolute source path.
    pub source: PathBuf,
    /// Bytes to write.
    pub content: Vec<u8>,
    /// Hash of `content`.
    pub hash: ContentHash,
    /// Asset metadata.
    pub info: AssetInfo,
    /// Whether a `force` pattern overwrites an asset the host already had.
    pub replaces_existing: bool,
}

/// Builds the destination-to-entry mapping of a run.
///
/// Entries must be added in reconciliation order: pattern order, then
/// lexical order within a pattern. On a shared destination a later entry
/// wins only if its pattern has `force`; otherwise the earlier one is kept
/// and a [`Warning::Conflict`] is recorded, even when both carry the same
/// content. Destinations the host already has are only written by `force`
/// patterns.
pub struct Reconciler<'a> {
    assets: &'a dyn AssetStore,
    stats: &'a StatsTracker,
    emissions: Vec<EmissionRecord>,
    by_destination: HashMap<String, usize>,
    warnings: Vec<Warning>,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler checking destinations against `assets`.
    #[must_use]
    pub fn new(assets: &'a dyn AssetStore, stats: &'a StatsTracker) -> Self {
        Self {
            assets,
            stats,
            emissions: Vec::new(),
            by_destination: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Add the next entry.
    pub fn add(&mut self, entry: ResolvedEntry) {
        if let Some(&slot) = self.by_destination.get(&entry.destination) {
            let existing = &self.emissions[slot];

            if entry.force {
                log::debug!(
                    "'{}' from {} overwrites the one from {}",
                    entry.destination,
                    entry.source.display(),
                    existing.source.display()
                );
                let replaces_existing = existing.replaces_existing;
                self.emissions[slot] = into_record(entry, replaces_existing);
            } else {
                log::debug!(
                    "'{}' already emitted from {}, skipping {}",
                    entry.destination,
                    existing.source.display(),
                    entry.source.display()
                );
                self.warnings.push(Warning::Conflict {
                    destination: entry.destination.clone(),
                    kept: existing.source.clone(),
                    dropped: entry.source.clone(),
                });
                self.stats.record_skipped();
            }
            return;
        }

        let exists = self.assets.has_asset(&entry.destination);
        if exists && !entry.force {
            log::debug!(
                "Skipping '{}': already present in the output, use force to overwrite",
                entry.destination
            );
            self.stats.record_skipped();
            return;
        }

        if exists {
            log::debug!("Updating existing asset '{}'", entry.destination);
        }

        self.by_destination
            .insert(entry.destination.clone(), self.emissions.len());
        self.emissions.push(into_record(entry, exists));
    }

    /// The emissions in order of first insertion, and the collected warnings.
    #[must_use]
    pub fn finish(self) -> (Vec<EmissionRecord>, Vec<Warning>) {
        for emission in &self.emissions {
            log::trace!(
                "Emitting '{}' from {}",
                emission.destination,
                emission.source.display()
            );
            self.stats.record_emitted();
        }

        (self.emissions, self.warnings)
    }
}

fn into_record(entry: ResolvedEntry, replaces_existing: bool) -> EmissionRecord {
    let mut extra = entry.info;
    for key in RESERVED_INFO_KEYS {
        extra.remove(key);
    }

    EmissionRecord {
        destination: entry.destination,
        source: entry.source,
        content: entry.content,
        hash: entry.hash,
        info: AssetInfo {
            copied: true,
            immutable: entry.immutable,
            source_filename: entry.source_filename,
            extra,
        },
        replaces_existing,
    }
}
