//! Dependency collection for the host's file watcher.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Paths read during a run, split by watch granularity.
///
/// A watched directory retriggers on any addition or removal inside it; a
/// watched file only on its own change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    files: BTreeSet<PathBuf>,
    directories: BTreeSet<PathBuf>,
}

impl Dependencies {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single-file dependency.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.files.insert(path.into());
    }

    /// Record a directory dependency.
    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.directories.insert(path.into());
    }

    /// Merge another collection into this one.
    pub fn extend(&mut self, other: Self) {
        self.files.extend(other.files);
        self.directories.extend(other.directories);
    }

    /// The file and directory sets. A path recorded as both is only reported
    /// as a directory.
    #[must_use]
    pub fn into_sets(self) -> (BTreeSet<PathBuf>, BTreeSet<PathBuf>) {
        let Self { files, directories } = self;
        let files = files
            .into_iter()
            .filter(|path| !directories.contains(path))
            .collect();

        (files, directories)
    }
}
