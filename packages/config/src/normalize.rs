//! Pattern normalization.
//!
//! Turns user declarations into [`Pattern`]s with absolute contexts and
//! validated ignore lists. This is a pure transform: nothing here touches the
//! filesystem.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use assetcopy_glob::{MatcherOptions, PatternMatcher, glob_root, is_glob, to_slash};

use crate::error::ConfigError;
use crate::pattern::{FilterFn, RawPattern, To, Transform};
use crate::types::{GlobOptions, ResolveOptions, ToType};

/// A validated copy pattern.
#[derive(Clone)]
pub struct Pattern {
    /// Declaration index, used in diagnostics.
    pub index: usize,
    /// Source as declared, relative to `context` when it is a glob.
    pub from: String,
    /// Absolute, lexically cleaned source path.
    pub absolute_from: PathBuf,
    /// Absolute context directory.
    pub context: PathBuf,
    /// Whether `from` uses glob syntax.
    pub is_glob: bool,
    /// Destination; an absolute `to` has been made relative to the output path.
    pub to: Option<To>,
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
    /// Reconciliation priority.
    pub priority: i32,
    /// Report an empty match as a warning instead of an error.
    pub no_error_on_missing: bool,
    /// Extra metadata attached to every emitted asset.
    pub info: BTreeMap<String, serde_json::Value>,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("index", &self.index)
            .field("from", &self.from)
            .field("absolute_from", &self.absolute_from)
            .field("context", &self.context)
            .field("is_glob", &self.is_glob)
            .field("to", &self.to)
            .field("to_type", &self.to_type)
            .field("force", &self.force)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl Pattern {
    /// Matcher options for this pattern's glob.
    #[must_use]
    pub fn matcher_options(&self) -> MatcherOptions {
        self.glob_options.matcher_options()
    }
}

/// Resolve `path` against `base`, yielding an absolute, lexically cleaned path.
#[must_use]
pub fn resolve_context(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path_clean::clean(path)
    } else {
        path_clean::clean(base.join(path))
    }
}

/// Normalize every pattern of a run.
///
/// # Arguments
///
/// * `patterns` - Declarations in order
/// * `base_context` - Absolute directory relative contexts resolve against
/// * `options` - Resolve options (used for absolute `to`)
///
/// # Errors
///
/// * If `base_context` is relative
/// * If any pattern is invalid; the first invalid pattern is reported
pub fn normalize_patterns(
    patterns: &[RawPattern],
    base_context: &Path,
    options: &ResolveOptions,
) -> Result<Vec<Pattern>, ConfigError> {
    if !base_context.is_absolute() {
        return Err(ConfigError::RelativeBaseContext(base_context.to_path_buf()));
    }

    patterns
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_pattern(index, raw, base_context, options))
        .collect()
}

/// Normalize a single pattern.
///
/// * A relative `context` resolves against `base_context`; it defaults to
///   `base_context`, or, for an absolute `from`, to its parent directory (its
///   glob root when it is a glob).
/// * An absolute glob is rewritten relative to its context.
/// * An empty `to` is treated as unset.
///
/// # Errors
///
/// * If `from` is empty
/// * If the glob or an ignore pattern does not compile
/// * If an absolute `to` is outside `options.output_path`
pub fn normalize_pattern(
    index: usize,
    raw: &RawPattern,
    base_context: &Path,
    options: &ResolveOptions,
) -> Result<Pattern, ConfigError> {
    let from = raw.from.trim();
    if from.is_empty() {
        return Err(ConfigError::MissingFrom { index });
    }

    let from_path = Path::new(from);
    let glob = is_glob(from);

    let context = match (&raw.context, from_path.is_absolute()) {
        (Some(context), _) => resolve_context(base_context, context),
        (None, true) if glob => path_clean::clean(glob_root(from)),
        (None, true) => from_path
            .parent()
            .map_or_else(|| from_path.to_path_buf(), path_clean::clean),
        (None, false) => path_clean::clean(base_context),
    };

    let absolute_from = resolve_context(&context, from_path);

    let (context, from) = if glob && from_path.is_absolute() {
        relative_glob(from, context)
    } else {
        (context, from.trim_start_matches("./").to_string())
    };

    let matcher_options = raw.glob_options.matcher_options();
    validate_globs(index, &from, glob, &matcher_options)?;

    let to = match &raw.to {
        Some(To::Path(to)) if to.is_empty() => None,
        Some(To::Path(to)) if Path::new(to).is_absolute() => {
            Some(To::Path(relative_to_output(index, to, options)?))
        }
        other => other.clone(),
    };

    log::trace!(
        "Normalized pattern #{index}: from '{from}' in {} (glob: {glob})",
        context.display()
    );

    Ok(Pattern {
        index,
        from,
        absolute_from,
        context,
        is_glob: glob,
        to,
        to_type: raw.to_type,
        glob_options: raw.glob_options.clone(),
        filter: raw.filter.clone(),
        transform: raw.transform.clone(),
        force: raw.force,
        priority: raw.priority,
        no_error_on_missing: raw.no_error_on_missing,
        info: raw.info.clone(),
    })
}

/// Rewrite an absolute glob relative to its context.
///
/// A glob outside `context` is matched from its own glob root instead.
fn relative_glob(from: &str, context: PathBuf) -> (PathBuf, String) {
    let from_path = Path::new(from);
    if let Ok(relative) = from_path.strip_prefix(&context) {
        return (context, to_slash(relative));
    }

    let root = path_clean::clean(glob_root(from));
    log::debug!(
        "'{from}' is outside {}, matching it from {}",
        context.display(),
        root.display()
    );

    let relative = from_path
        .strip_prefix(&root)
        .map_or_else(|_| from.trim_start_matches('/').to_string(), to_slash);
    (root, relative)
}

/// Compile the ignore list once so syntax errors surface before any matching.
///
/// A glob that does not compile may still name a literal path; that can only
/// be told by looking at the filesystem, so it is left to the matcher.
fn validate_globs(
    index: usize,
    from: &str,
    glob: bool,
    matcher_options: &MatcherOptions,
) -> Result<(), ConfigError> {
    PatternMatcher::new("**", matcher_options)
        .map_err(|source| ConfigError::InvalidGlob { index, source })?;

    if glob && let Err(e) = PatternMatcher::new(from, matcher_options) {
        log::debug!("'{from}' is not a valid glob, deciding when matching: {e}");
    }

    Ok(())
}

fn relative_to_output(index: usize, to: &str, options: &ResolveOptions) -> Result<String, ConfigError> {
    let absolute_to = || ConfigError::AbsoluteTo {
        index,
        to: to.to_string(),
    };

    let output_path = options.output_path.as_deref().ok_or_else(absolute_to)?;
    let cleaned = path_clean::clean(to);
    let relative = cleaned
        .strip_prefix(path_clean::clean(output_path))
        .map_err(|_| absolute_to())?;

    let mut relative = to_slash(relative);
    if to.ends_with('/') && !relative.is_empty() {
        relative.push('/');
    }

    Ok(relative)
}
