//! Error and warning types for pattern resolution.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use assetcopy_config::ConfigError;
use assetcopy_copy::ContentError;
use assetcopy_glob::WalkError;
use thiserror::Error;

/// Errors that abort a whole resolve run.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A pattern is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A directory could not be walked.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A matched source exists but could not be read.
    #[error(transparent)]
    Content(ContentError),

    /// Failed to get metadata for a pattern's source.
    #[error("Failed to get metadata for {}: {io_error}", path.display())]
    Metadata {
        /// The source path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },
}

/// Errors scoped to one pattern or entry.
///
/// These are collected and returned with the run's output; sibling patterns
/// and entries are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern matched nothing.
    #[error("Pattern #{index}: unable to locate '{from}' at '{}'", path.display())]
    NotFound {
        /// Declaration index of the pattern.
        index: usize,
        /// The pattern's `from`.
        from: String,
        /// Absolute location that was searched.
        path: PathBuf,
    },

    /// A `filter`, `transform` or function-valued `to` hook failed.
    #[error("Pattern #{index}: hook failed for {}: {message}", path.display())]
    Transform {
        /// Declaration index of the pattern.
        index: usize,
        /// The source being processed.
        path: PathBuf,
        /// Error message from the hook.
        message: String,
    },
}

/// Non-fatal conditions reported with the run's output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// Two entries without `force` resolved to the same destination.
    #[error(
        "Conflict: multiple sources resolve to '{destination}': kept {}, dropped {}",
        kept.display(),
        dropped.display()
    )]
    Conflict {
        /// The shared destination.
        destination: String,
        /// Source of the entry that is emitted.
        kept: PathBuf,
        /// Source of the entry that was dropped.
        dropped: PathBuf,
    },

    /// A pattern with `noErrorOnMissing` matched nothing.
    #[error("Pattern #{index}: nothing matched '{from}' at '{}'", path.display())]
    MissingSource {
        /// Declaration index of the pattern.
        index: usize,
        /// The pattern's `from`.
        from: String,
        /// Absolute location that was searched.
        path: PathBuf,
    },
}
