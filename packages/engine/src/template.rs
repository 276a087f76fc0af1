//! Destination path computation.
//!
//! A string `to` is a file path, a directory or a template. Templates may use:
//!
//! | Placeholder | Expands to |
//! |---|---|
//! | `[path]` | directory of the relative path, with a trailing `/`, or nothing |
//! | `[name]` | file name without extension |
//! | `[ext]` | extension without the dot |
//! | `[base]` | file name with extension |
//! | `[contenthash]` | content hash, truncated to the configured digest length |
//! | `[contenthash:N]` | first `N` characters of the content hash |
//!
//! Unknown bracketed text is kept as is.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use assetcopy_config::{HookError, Pattern, To, ToContext, ToType};
use assetcopy_copy::ContentHash;
use assetcopy_glob::to_slash;

use crate::matcher::MatchedEntry;

const PLACEHOLDERS: [&str; 6] = [
    "[path]",
    "[name]",
    "[ext]",
    "[base]",
    "[contenthash]",
    "[contenthash:",
];

/// A computed destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Output-relative, `/`-separated path.
    pub path: String,
    /// Whether the path encodes the content hash.
    pub immutable: bool,
}

/// Whether `to` contains any placeholder.
#[must_use]
pub fn is_template(to: &str) -> bool {
    PLACEHOLDERS.iter().any(|placeholder| to.contains(placeholder))
}

/// How a string `to` is interpreted, unless `explicit` says otherwise.
#[must_use]
pub fn classify(to: &str, explicit: Option<ToType>) -> ToType {
    explicit.unwrap_or_else(|| {
        if is_template(to) {
            ToType::Template
        } else if to.ends_with('/') || Path::new(to).extension().is_none() {
            ToType::Dir
        } else {
            ToType::File
        }
    })
}

/// Compute the destination of `entry`.
///
/// # Arguments
///
/// * `pattern` - The pattern that matched `entry`
/// * `entry` - The matched source
/// * `hash` - Hash of the entry's final content
/// * `digest_length` - Length of a bare `[contenthash]`
///
/// # Errors
///
/// * If a function-valued `to` fails
pub fn render_destination(
    pattern: &Pattern,
    entry: &MatchedEntry,
    hash: &ContentHash,
    digest_length: usize,
) -> Result<Destination, HookError> {
    let relative = entry.relative_path.as_str();

    let to = match &pattern.to {
        None => {
            return Ok(Destination {
                path: clean(relative),
                immutable: false,
            });
        }
        Some(To::Path(to)) => to.clone(),
        Some(To::Function(to)) => to(&ToContext {
            relative_path: relative,
            absolute_filename: &entry.absolute_path,
        })?,
    };

    if to.is_empty() {
        return Ok(Destination {
            path: clean(relative),
            immutable: false,
        });
    }

    let destination = match classify(&to, pattern.to_type) {
        ToType::Template => {
            let (path, hashed) = substitute(&to, relative, hash, digest_length);
            Destination {
                path: clean(&path),
                immutable: hashed,
            }
        }
        ToType::Dir => {
            let dir = to.trim_end_matches('/');
            Destination {
                path: clean(&format!("{dir}/{relative}")),
                immutable: false,
            }
        }
        ToType::File => Destination {
            path: clean(&to),
            immutable: false,
        },
    };

    log::trace!(
        "{} -> {} (immutable: {})",
        entry.absolute_path.display(),
        destination.path,
        destination.immutable
    );

    Ok(destination)
}

/// Expand the placeholders of `template` for `relative`.
#[must_use]
pub fn expand(template: &str, relative: &str, hash: &ContentHash, digest_length: usize) -> String {
    substitute(template, relative, hash, digest_length).0
}

/// Expand `template`, also reporting whether a content hash was substituted.
fn substitute(
    template: &str,
    relative: &str,
    hash: &ContentHash,
    digest_length: usize,
) -> (String, bool) {
    let (directory, base) = relative
        .rsplit_once('/')
        .map_or(("", relative), |(directory, base)| (directory, base));
    let base_path = Path::new(base);
    let name = base_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base_path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = String::with_capacity(template.len() + relative.len());
    let mut rest = template;
    let mut hashed = false;

    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let Some(end) = tail.find(']') else {
            out.push_str(tail);
            return (out, hashed);
        };

        let token = &tail[1..end];
        let replacement = match token {
            "path" if directory.is_empty() => Some(String::new()),
            "path" => Some(format!("{directory}/")),
            "name" => Some(name.clone()),
            "ext" => {
                if ext.is_empty() && out.ends_with('.') {
                    out.pop();
                }
                Some(ext.clone())
            }
            "base" => Some(base.to_string()),
            "contenthash" => {
                hashed = true;
                Some(hash.prefix(digest_length).to_string())
            }
            _ => token
                .strip_prefix("contenthash:")
                .and_then(|len| len.parse::<usize>().ok())
                .map(|len| {
                    hashed = true;
                    hash.prefix(len).to_string()
                }),
        };

        if let Some(replacement) = replacement {
            out.push_str(&replacement);
            rest = &tail[end + 1..];
        } else {
            out.push('[');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    (out, hashed)
}

fn clean(path: &str) -> String {
    to_slash(&path_clean::clean(path))
}
