//! Host-provided view of the output set.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

/// Lookup of destinations already present in the host's output set.
pub trait AssetStore: Sync {
    /// Whether an asset already exists at `destination` (`/`-separated).
    fn has_asset(&self, destination: &str) -> bool;
}

/// An empty output set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn has_asset(&self, _destination: &str) -> bool {
        false
    }
}

impl<S: BuildHasher + Sync> AssetStore for HashSet<String, S> {
    fn has_asset(&self, destination: &str) -> bool {
        self.contains(destination)
    }
}

impl AssetStore for BTreeSet<String> {
    fn has_asset(&self, destination: &str) -> bool {
        self.contains(destination)
    }
}
