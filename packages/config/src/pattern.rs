//! Programmatic copy pattern declarations and their hooks.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::{GlobOptions, PatternConfig, PatternObject, ToType};

/// Error returned by a user hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Decides whether a matched source file is copied.
pub type FilterFn = Arc<dyn Fn(&Path) -> Result<bool, HookError> + Send + Sync>;

/// Rewrites a source file's bytes before they are emitted.
pub type TransformFn = Arc<dyn Fn(&[u8], &Path) -> Result<Vec<u8>, HookError> + Send + Sync>;

/// Computes a destination from a matched entry.
pub type ToFn = Arc<dyn Fn(&ToContext<'_>) -> Result<String, HookError> + Send + Sync>;

/// Arguments handed to a function-valued `to`.
#[derive(Debug, Clone, Copy)]
pub struct ToContext<'a> {
    /// Source path relative to the pattern context, `/`-separated.
    pub relative_path: &'a str,
    /// Absolute source path.
    pub absolute_filename: &'a Path,
}

/// Destination of a pattern.
#[derive(Clone)]
pub enum To {
    /// A path, directory or template string.
    Path(String),
    /// A function computing the destination per entry.
    Function(ToFn),
}

impl fmt::Debug for To {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A content transform with an optional cache key.
///
/// With a cache key the transformed bytes are cached. The key must change
/// whenever the transform's behaviour does. Without one the raw bytes are
/// cached and the transform runs on every resolve.
#[derive(Clone)]
pub struct Transform {
    /// The transform itself.
    pub transformer: TransformFn,
    /// Identity of the transform for caching purposes.
    pub cache_key: Option<String>,
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("cache_key", &self.cache_key)
            .finish_non_exhaustive()
    }
}

/// A copy pattern as declared by the user, before normalization.
#[derive(Clone, Default)]
pub struct RawPattern {
    /// Source file, directory or glob.
    pub from: String,
    /// Destination.
    pub to: Option<To>,
    /// Directory `from` is resolved against.
    pub context: Option<PathBuf>,
    /// Explicit interpretation of a string `to`.
    pub to_type: Option<ToType>,
    /// Glob matching options.
    pub glob_options: GlobOptions,
    /// Per-file filter.
    pub filter: Option<FilterFn>,
    /// Content transform.
    pub transform: Option<Transform>,
    /// Overwrite destinations that already exist.
    pub force: bool,
    /// Patterns are reconciled in ascending priority order.
    pub priority: i32,
    /// Report an empty match as a warning instead of an error.
    pub no_error_on_missing: bool,
    /// Extra metadata attached to every emitted asset.
    pub info: BTreeMap<String, serde_json::Value>,
}

impl fmt::Debug for RawPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPattern")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("context", &self.context)
            .field("to_type", &self.to_type)
            .field("glob_options", &self.glob_options)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("transform", &self.transform)
            .field("force", &self.force)
            .field("priority", &self.priority)
            .field("no_error_on_missing", &self.no_error_on_missing)
            .field("info", &self.info)
            .finish()
    }
}

impl RawPattern {
    /// Create a pattern copying `from` with default options.
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            ..Self::default()
        }
    }

    /// Set a path, directory or template destination.
    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(To::Path(to.into()));
        self
    }

    /// Set a function computing the destination.
    #[must_use]
    pub fn to_fn<F>(mut self, to: F) -> Self
    where
        F: Fn(&ToContext<'_>) -> Result<String, HookError> + Send + Sync + 'static,
    {
        self.to = Some(To::Function(Arc::new(to)));
        self
    }

    /// Set the context directory.
    #[must_use]
    pub fn context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Force how a string `to` is interpreted.
    #[must_use]
    pub const fn to_type(mut self, to_type: ToType) -> Self {
        self.to_type = Some(to_type);
        self
    }

    /// Set the glob options.
    #[must_use]
    pub fn glob_options(mut self, glob_options: GlobOptions) -> Self {
        self.glob_options = glob_options;
        self
    }

    /// Set a per-file filter.
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Set a transform that re-runs on every resolve.
    #[must_use]
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&[u8], &Path) -> Result<Vec<u8>, HookError> + Send + Sync + 'static,
    {
        self.transform = Some(Transform {
            transformer: Arc::new(transform),
            cache_key: None,
        });
        self
    }

    /// Set a transform whose output is cached under `cache_key`.
    #[must_use]
    pub fn transform_cached<F>(mut self, cache_key: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&[u8], &Path) -> Result<Vec<u8>, HookError> + Send + Sync + 'static,
    {
        self.transform = Some(Transform {
            transformer: Arc::new(transform),
            cache_key: Some(cache_key.into()),
        });
        self
    }

    /// Overwrite destinations that already exist.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the reconciliation priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Report an empty match as a warning instead of an error.
    #[must_use]
    pub const fn no_error_on_missing(mut self, no_error_on_missing: bool) -> Self {
        self.no_error_on_missing = no_error_on_missing;
        self
    }

    /// Attach extra metadata to every emitted asset.
    #[must_use]
    pub fn info(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.info.insert(key.into(), value);
        self
    }
}

impl From<&str> for RawPattern {
    fn from(from: &str) -> Self {
        Self::new(from)
    }
}

impl From<String> for RawPattern {
    fn from(from: String) -> Self {
        Self::new(from)
    }
}

impl From<PatternObject> for RawPattern {
    fn from(object: PatternObject) -> Self {
        Self {
            from: object.from,
            to: object.to.map(To::Path),
            context: object.context,
            to_type: object.to_type,
            glob_options: object.glob_options,
            filter: None,
            transform: None,
            force: object.force,
            priority: object.priority,
            no_error_on_missing: object.no_error_on_missing,
            info: object.info,
        }
    }
}

impl From<PatternConfig> for RawPattern {
    fn from(config: PatternConfig) -> Self {
        match config {
            PatternConfig::Path(from) => Self::new(from),
            PatternConfig::Object(object) => object.into(),
        }
    }
}
