//! Error types for pattern configuration.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or normalizing copy patterns.
///
/// All of these are fatal: they are reported before any pattern is matched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A pattern has no `from`, or an empty one.
    #[error("Pattern #{index}: \"from\" is required and must not be empty")]
    MissingFrom {
        /// Declaration index of the pattern.
        index: usize,
    },

    /// A pattern's glob or ignore list does not compile.
    #[error("Pattern #{index}: {source}")]
    InvalidGlob {
        /// Declaration index of the pattern.
        index: usize,
        /// The underlying glob error.
        #[source]
        source: assetcopy_glob::GlobError,
    },

    /// An absolute `to` does not lie inside the output path.
    #[error("Pattern #{index}: absolute \"to\" {to} is not inside the output path")]
    AbsoluteTo {
        /// Declaration index of the pattern.
        index: usize,
        /// The offending destination.
        to: String,
    },

    /// The base context handed to the resolver is relative.
    #[error("Base context must be an absolute path, got {}", .0.display())]
    RelativeBaseContext(PathBuf),

    /// Failed to read configuration file.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config {}: {source}", path.display())]
    TomlParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON config {}: {source}", path.display())]
    JsonParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Unsupported configuration format.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}
