//! Error types for content loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Errors that can occur while loading a source file's content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The source disappeared before it could be read.
    #[error("Source file {} no longer exists", path.display())]
    Missing {
        /// The source path.
        path: PathBuf,
    },

    /// Failed to get file metadata.
    #[error("Failed to get metadata for {}: {io_error}", path.display())]
    MetadataError {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to read the source file.
    #[error("Failed to read {}: {io_error}", path.display())]
    ReadError {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The pattern's transform hook failed.
    #[error("Transform failed for {}: {message}", path.display())]
    TransformError {
        /// The source path.
        path: PathBuf,
        /// Error message from the hook.
        message: String,
    },
}
