//! Error types for glob compilation and directory walking.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while compiling a glob pattern.
#[derive(Debug, Error)]
pub enum GlobError {
    /// The pattern (or one derived from it) is not valid glob syntax.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// A `!(...)` segment was opened but never closed.
    #[error("Unbalanced negation segment in glob pattern '{0}'")]
    UnbalancedNegation(String),
}

/// Errors that can occur while walking a directory tree.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Failed to read a directory entry (permission denied, I/O failure...).
    #[error("Failed to walk {}: {io_error}", path.display())]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Directory enumeration failed without an underlying IO error.
    #[error("Failed to enumerate directory {}: {message}", path.display())]
    Enumeration {
        /// The directory path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}
