//! Copy pattern resolution for assetcopy.
//!
//! Turns an ordered list of copy patterns into a deterministic set of
//! `destination -> content` emissions plus the file and directory
//! dependencies a host watcher needs for incremental rebuilds.
//!
//! The pipeline, per run:
//!
//! 1. Normalize every pattern (fatal on invalid input)
//! 2. Match each pattern against the filesystem
//! 3. Load each entry's content through the cache and compute its destination,
//!    concurrently
//! 4. Reconcile all entries, in priority then declaration order, against each
//!    other and the host's existing output
//!
//! # Example
//!
//! ```rust,ignore
//! use assetcopy_cache::FsCache;
//! use assetcopy_config::{RawPattern, ResolveOptions};
//! use assetcopy_engine::{NoAssets, Resolver};
//!
//! let cache = FsCache::new(".cache/assetcopy");
//! let resolver = Resolver::new(&cache, &NoAssets, ResolveOptions::default());
//!
//! let output = resolver.resolve(
//!     &[
//!         RawPattern::from("public"),
//!         RawPattern::new("src/**/*.png").to("img/[name].[contenthash:8].[ext]"),
//!     ],
//!     &project_root,
//! )?;
//!
//! for emission in &output.emissions {
//!     println!("{} ({} bytes)", emission.destination, emission.content.len());
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod dependencies;
mod error;
mod host;
mod matcher;
mod reconcile;
mod resolve;
mod template;

pub use assetcopy_config::resolve_context;
pub use dependencies::Dependencies;
pub use error::{PatternError, ResolveError, Warning};
pub use host::{AssetStore, NoAssets};
pub use matcher::{MatchMode, MatchedEntry, PatternMatches, filter_entries, match_pattern};
pub use reconcile::{AssetInfo, EmissionRecord, Reconciler, ResolvedEntry};
pub use resolve::{ResolveOutput, Resolver};
pub use template::{Destination, classify, expand, is_template, render_destination};
