//! Glob pattern compilation and directory walking for assetcopy.
//!
//! This crate provides the filesystem primitives the copy engine matches
//! patterns with:
//!
//! * Glob syntax detection and glob root extraction
//! * `!(...)` negated path segments on top of `globset`
//! * Dotfile, ignore-list and case-sensitivity rules
//! * Sorted, symlink-following directory traversal using `jwalk`
//!
//! # Example
//!
//! ```rust,ignore
//! use assetcopy_glob::{MatcherOptions, PatternMatcher, glob_root, walk};
//!
//! let matcher = PatternMatcher::new("!(vendor)/**/*.txt", &MatcherOptions::default())?;
//! let root = context.join(glob_root("!(vendor)/**/*.txt"));
//!
//! for entry in walk(&root)?.entries {
//!     if matcher.is_match(&entry.relative) {
//!         println!("{}", entry.path.display());
//!     }
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod path;
mod pattern;
mod walk;

pub use error::{GlobError, WalkError};
pub use path::to_slash;
pub use pattern::{MatcherOptions, PatternMatcher, glob_root, is_glob};
pub use walk::{Walk, WalkEntry, walk};
