//! Glob pattern compilation.
//!
//! `globset` does the heavy lifting. On top of it this module adds the pieces
//! copy patterns rely on that `globset` has no syntax for: negated path
//! segments (`!(a|b)`), dotfile exclusion and an ignore list.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::GlobError;

/// Options controlling how a pattern matches relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Match path segments starting with `.`.
    pub dot: bool,
    /// Match letters case-sensitively.
    pub case_sensitive: bool,
    /// Patterns whose matches are always rejected.
    pub ignore: Vec<String>,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            dot: false,
            case_sensitive: true,
            ignore: Vec::new(),
        }
    }
}

/// One `/`-separated segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Plain(&'a str),
    Negated(Vec<&'a str>),
}

impl Segment<'_> {
    /// The segment as it appears in the positive glob.
    fn as_include(&self) -> String {
        match self {
            Self::Plain(text) => (*text).to_string(),
            Self::Negated(_) => "*".to_string(),
        }
    }

    /// Whether the segment spells out a dotfile name itself.
    fn names_dotfile(&self) -> bool {
        match self {
            Self::Plain(text) => is_dot_segment(text),
            Self::Negated(_) => false,
        }
    }
}

/// A compiled copy pattern.
///
/// A relative path matches when it matches the positive glob, does not fall
/// under any negated segment, is not ignored and passes the dotfile rule.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    include: GlobSet,
    exclude: GlobSet,
    ignore: GlobSet,
    dot: bool,
}

impl PatternMatcher {
    /// Compile `pattern` with the given options.
    ///
    /// # Arguments
    ///
    /// * `pattern` - `/`-separated glob, relative to the directory paths will be matched against
    /// * `options` - Dotfile, case and ignore settings
    ///
    /// # Errors
    ///
    /// * If the pattern or any ignore pattern is not valid glob syntax
    /// * If a `!(` segment is not closed
    pub fn new(pattern: &str, options: &MatcherOptions) -> Result<Self, GlobError> {
        let segments = parse_segments(pattern)?;

        let include_text = segments
            .iter()
            .map(Segment::as_include)
            .collect::<Vec<_>>()
            .join("/");

        let mut include = GlobSetBuilder::new();
        include.add(build_glob(&include_text, options)?);

        // A negated segment excludes the prefix ending in it and everything below.
        let mut exclude = GlobSetBuilder::new();
        for (index, segment) in segments.iter().enumerate() {
            if let Segment::Negated(alternatives) = segment {
                let mut prefix: Vec<String> =
                    segments[..index].iter().map(Segment::as_include).collect();
                prefix.push(alternation(alternatives));
                let prefix = prefix.join("/");

                exclude.add(build_glob(&prefix, options)?);
                exclude.add(build_glob(&format!("{prefix}/**"), options)?);
            }
        }

        let mut ignore = GlobSetBuilder::new();
        for ignored in &options.ignore {
            ignore.add(build_glob(ignored, options)?);
        }

        let explicit_dot = segments.iter().any(Segment::names_dotfile);

        log::trace!(
            "Compiled pattern '{pattern}' as '{include_text}' (dot: {}, ignore: {:?})",
            options.dot || explicit_dot,
            options.ignore
        );

        Ok(Self {
            include: build_set(include, pattern)?,
            exclude: build_set(exclude, pattern)?,
            ignore: build_set(ignore, pattern)?,
            dot: options.dot || explicit_dot,
        })
    }

    /// Check a `/`-separated relative path against the pattern.
    #[must_use]
    pub fn is_match(&self, relative: &str) -> bool {
        if !self.dot && relative.split('/').any(is_dot_segment) {
            return false;
        }

        self.include.is_match(relative)
            && !self.exclude.is_match(relative)
            && !self.is_ignored(relative)
    }

    /// Check a `/`-separated relative path against the ignore list only.
    #[must_use]
    pub fn is_ignored(&self, relative: &str) -> bool {
        self.ignore.is_match(relative)
    }
}

/// Whether `pattern` uses any glob syntax.
///
/// Backslash-escaped characters never count.
#[must_use]
pub fn is_glob(pattern: &str) -> bool {
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' | '[' | '{' => return true,
            '!' | '+' | '@' if chars.peek() == Some(&'(') => return true,
            _ => {}
        }
    }

    false
}

/// The longest directory prefix of `pattern` free of glob syntax.
///
/// The last segment is never part of the root: it names the matched entries.
/// Escapes are removed so the result can be joined onto a real path.
///
/// # Examples
///
/// * `directory/**/*` -> `directory`
/// * `!(directory)/**/*.txt` -> `` (empty: walk the context itself)
/// * `/abs/dir/*.txt` -> `/abs/dir`
#[must_use]
pub fn glob_root(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();

    let literal = segments
        .iter()
        .take_while(|segment| !is_glob(segment))
        .count()
        .min(segments.len().saturating_sub(1));

    let root = segments[..literal].join("/");

    if root.is_empty() && pattern.starts_with('/') {
        "/".to_string()
    } else {
        unescape(&root)
    }
}

fn parse_segments(pattern: &str) -> Result<Vec<Segment<'_>>, GlobError> {
    pattern
        .split('/')
        .map(|segment| {
            let Some(inner) = segment.strip_prefix("!(") else {
                return Ok(Segment::Plain(segment));
            };

            let Some(inner) = inner.strip_suffix(')') else {
                return Err(GlobError::UnbalancedNegation(pattern.to_string()));
            };

            if !parens_balanced(inner) {
                return Err(GlobError::UnbalancedNegation(pattern.to_string()));
            }

            Ok(Segment::Negated(inner.split('|').collect()))
        })
        .collect()
}

fn parens_balanced(text: &str) -> bool {
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    depth == 0
}

fn alternation(alternatives: &[&str]) -> String {
    match alternatives {
        [single] => (*single).to_string(),
        _ => format!("{{{}}}", alternatives.join(",")),
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }

    out
}

fn build_glob(pattern: &str, options: &MatcherOptions) -> Result<Glob, GlobError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|source| GlobError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build_set(builder: GlobSetBuilder, pattern: &str) -> Result<GlobSet, GlobError> {
    builder.build().map_err(|source| GlobError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
