//! Copy pattern declarations and configuration for assetcopy.
//!
//! This crate provides the pattern types the copy engine consumes and turns
//! them into validated [`Pattern`]s.
//!
//! # Declaring Patterns
//!
//! * Programmatically, with [`RawPattern`] and its builder methods (the only
//!   way to attach `filter`, `transform` or function-valued `to` hooks)
//! * From TOML (`*.toml`) or JSON (`*.json`) files via [`load_config`]
//!
//! # Example
//!
//! ```rust,ignore
//! use assetcopy_config::{RawPattern, ResolveOptions, normalize_patterns};
//!
//! let patterns = vec![
//!     RawPattern::from("favicon.ico"),
//!     RawPattern::new("static").to("assets/").force(true),
//! ];
//!
//! let normalized = normalize_patterns(&patterns, &project_root, &ResolveOptions::default())?;
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod loader;
mod normalize;
mod pattern;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_json_config, load_toml_config};
pub use normalize::{Pattern, normalize_pattern, normalize_patterns, resolve_context};
pub use pattern::{
    FilterFn, HookError, RawPattern, To, ToContext, ToFn, Transform, TransformFn,
};
pub use types::{
    CopyConfig, DEFAULT_HASH_DIGEST_LENGTH, GlobOptions, PatternConfig, PatternObject,
    ResolveOptions, ToType,
};
