//! Serializable configuration types for assetcopy.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use assetcopy_glob::MatcherOptions;
use serde::{Deserialize, Serialize};

/// Default length of a bare `[contenthash]` placeholder.
pub const DEFAULT_HASH_DIGEST_LENGTH: usize = 20;

/// How a pattern's `to` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToType {
    /// `to` is the exact destination file.
    File,
    /// `to` is a directory the relative path is placed under.
    Dir,
    /// `to` contains placeholders such as `[name]` or `[contenthash]`.
    Template,
}

/// Glob matching options of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobOptions {
    /// Match entries whose name starts with `.`.
    #[serde(default)]
    pub dot: bool,

    /// Match letters case-sensitively.
    #[serde(default = "default_true")]
    pub case_sensitive: bool,

    /// Glob patterns (relative to the context) that are never copied.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Only match files. When `false`, globs also match directories.
    #[serde(default = "default_true")]
    pub only_files: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            dot: false,
            case_sensitive: true,
            ignore: Vec::new(),
            only_files: true,
        }
    }
}

impl GlobOptions {
    /// Matcher options for this pattern's glob.
    #[must_use]
    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            dot: self.dot,
            case_sensitive: self.case_sensitive,
            ignore: self.ignore.clone(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_hash_digest_length() -> usize {
    DEFAULT_HASH_DIGEST_LENGTH
}

/// A copy pattern as written in a config file.
///
/// Either a bare source string or a full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternConfig {
    /// Shorthand for `{ from = "..." }`.
    Path(String),
    /// Full pattern declaration.
    Object(PatternObject),
}

/// Object form of a copy pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternObject {
    /// Source file, directory or glob.
    #[serde(default)]
    pub from: String,

    /// Destination path, directory or template.
    #[serde(default)]
    pub to: Option<String>,

    /// Directory `from` is resolved against.
    #[serde(default)]
    pub context: Option<PathBuf>,

    /// Explicit interpretation of `to`.
    #[serde(default)]
    pub to_type: Option<ToType>,

    /// Overwrite destinations that already exist.
    #[serde(default)]
    pub force: bool,

    /// Patterns are reconciled in ascending priority order.
    #[serde(default)]
    pub priority: i32,

    /// Report an empty match as a warning instead of an error.
    #[serde(default)]
    pub no_error_on_missing: bool,

    /// Glob matching options.
    #[serde(default)]
    pub glob_options: GlobOptions,

    /// Extra metadata attached to every emitted asset.
    #[serde(default)]
    pub info: BTreeMap<String, serde_json::Value>,
}

/// Options for one resolve run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Upper bound on worker threads. Defaults to available parallelism, at most 8.
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Number of hex characters a bare `[contenthash]` expands to.
    #[serde(default = "default_hash_digest_length")]
    pub hash_digest_length: usize,

    /// Output root; an absolute `to` inside it is made relative to it.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            concurrency: None,
            hash_digest_length: DEFAULT_HASH_DIGEST_LENGTH,
            output_path: None,
        }
    }
}

impl ResolveOptions {
    /// Number of worker threads to use for a run.
    #[must_use]
    pub fn worker_limit(&self) -> usize {
        let n_cpu = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);

        match self.concurrency {
            Some(n) => n.max(1),
            None => n_cpu.clamp(1, 8),
        }
    }
}

/// A complete copy configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyConfig {
    /// Patterns in declaration order.
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,

    /// Resolve options.
    #[serde(default)]
    pub options: ResolveOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_options_defaults() {
        let options: GlobOptions = serde_json::from_str("{}").unwrap();

        assert_eq!(options, GlobOptions::default());
        assert!(options.case_sensitive);
        assert!(options.only_files);
        assert!(!options.dot);
    }

    #[test]
    fn test_pattern_config_string_or_object() {
        let patterns: Vec<PatternConfig> =
            serde_json::from_str(r#"["file.txt", {"from": "dir", "to": "out/", "force": true}]"#)
                .unwrap();

        assert_eq!(patterns[0], PatternConfig::Path("file.txt".to_string()));
        let PatternConfig::Object(object) = &patterns[1] else {
            panic!("expected object pattern");
        };
        assert_eq!(object.from, "dir");
        assert_eq!(object.to.as_deref(), Some("out/"));
        assert!(object.force);
        assert_eq!(object.priority, 0);
    }

    #[test]
    fn test_to_type_lowercase() {
        let object: PatternObject =
            serde_json::from_str(r#"{"from": "a", "toType": "template"}"#).unwrap();

        assert_eq!(object.to_type, Some(ToType::Template));
    }

    #[test]
    fn test_worker_limit() {
        let options = ResolveOptions {
            concurrency: Some(0),
            ..ResolveOptions::default()
        };
        assert_eq!(options.worker_limit(), 1);

        let options = ResolveOptions {
            concurrency: Some(3),
            ..ResolveOptions::default()
        };
        assert_eq!(options.worker_limit(), 3);

        let limit = ResolveOptions::default().worker_limit();
        assert!((1..=8).contains(&limit));
    }
}
