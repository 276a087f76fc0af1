//! Directory traversal using jwalk.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WalkError;
use crate::path::to_slash;

/// An entry found beneath a walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Path relative to the walk root, `/`-separated.
    pub relative: String,
    /// Whether the entry is a directory (after following symlinks).
    pub is_dir: bool,
}

/// Result of walking a directory tree.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    /// Every file and directory beneath the root, in lexical order.
    pub entries: Vec<WalkEntry>,
    /// Every directory whose contents were read, the root included.
    pub directories: Vec<PathBuf>,
}

/// Walk `root` recursively.
///
/// Hidden entries are included; filtering is up to the caller. Symlinks are
/// followed, so symlinked files appear as files and symlinked directories as
/// directories. A symlink pointing back at one of its own ancestors is not
/// descended into.
///
/// Entries whose path below the root is not valid UTF-8 are skipped with a
/// warning. A missing root yields an empty walk.
///
/// # Arguments
///
/// * `root` - Directory to walk
///
/// # Errors
///
/// * If a directory cannot be read (permission denied, I/O failure)
pub fn walk(root: &Path) -> Result<Walk, WalkError> {
    log::debug!("Walking {}", root.display());

    if !root.is_dir() {
        log::debug!("Walk root is not a directory");
        return Ok(Walk::default());
    }

    let mut result = Walk::default();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(true)
        .sort(true)
        .process_read_dir(|_depth, dir_path, _state, children| {
            for child in children.iter_mut().flatten() {
                if child.read_children_path.is_some()
                    && child.path_is_symlink()
                    && links_to_ancestor(dir_path, &child.path())
                {
                    log::debug!(
                        "Not descending into {}: symlink to an ancestor",
                        child.path().display()
                    );
                    child.read_children_path = None;
                }
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                if let Some(ancestor) = e.loop_ancestor() {
                    log::debug!(
                        "Not descending into {}: symlink to ancestor {}",
                        path.display(),
                        ancestor.display()
                    );
                    continue;
                }
                match e.io_error() {
                    Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
                        log::trace!("Entry vanished during walk: {}", path.display());
                        continue;
                    }
                    Some(io) => {
                        return Err(WalkError::Io {
                            path,
                            io_error: std::io::Error::new(io.kind(), io.to_string()),
                        });
                    }
                    None => {
                        return Err(WalkError::Enumeration {
                            path,
                            message: e.to_string(),
                        });
                    }
                }
            }
        };

        let path = entry.path();
        let file_type = entry.file_type();

        if entry.depth == 0 {
            result.directories.push(path);
            continue;
        }

        if !file_type.is_file() && !file_type.is_dir() {
            log::trace!("Skipping {}: not a file or directory", path.display());
            continue;
        }

        if file_type.is_dir() && entry.read_children_path.is_some() {
            result.directories.push(path.clone());
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|_| WalkError::Enumeration {
                path: path.clone(),
                message: "Failed to strip prefix".to_string(),
            })?;

        if relative.to_str().is_none() {
            log::warn!("Skipping {}: name is not valid UTF-8", path.display());
            continue;
        }
        let relative = to_slash(relative);

        result.entries.push(WalkEntry {
            path,
            relative,
            is_dir: file_type.is_dir(),
        });
    }

    result.entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    result.directories.sort();

    log::debug!(
        "Found {} entries in {} directories",
        result.entries.len(),
        result.directories.len()
    );

    Ok(result)
}

/// Whether the symlink at `link` resolves to `dir` or one of its ancestors.
fn links_to_ancestor(dir: &Path, link: &Path) -> bool {
    match (fs::canonicalize(dir), fs::canonicalize(link)) {
        (Ok(dir), Ok(target)) => dir.starts_with(target),
        _ => false,
    }
}
