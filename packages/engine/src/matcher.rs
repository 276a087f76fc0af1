//! Filesystem matching of normalized patterns.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use assetcopy_config::{ConfigError, Pattern};
use assetcopy_glob::{MatcherOptions, PatternMatcher, glob_root, walk};

use crate::dependencies::Dependencies;
use crate::error::{PatternError, ResolveError};

/// How a pattern's `from` was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// An existing regular file.
    File,
    /// An existing directory, copied recursively.
    Directory,
    /// A glob evaluated beneath the context.
    Glob,
    /// A literal path that does not exist.
    Missing,
}

/// A filesystem object matched by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    /// Absolute source path.
    pub absolute_path: PathBuf,
    /// Path the destination is derived from, `/`-separated.
    pub relative_path: String,
    /// Whether the entry is a directory (globs with `onlyFiles: false`).
    pub is_dir: bool,
}

/// Everything one pattern matched.
#[derive(Debug, Clone)]
pub struct PatternMatches {
    /// The interpretation of `from`.
    pub mode: MatchMode,
    /// Matches in lexical order of their relative paths.
    pub entries: Vec<MatchedEntry>,
    /// Paths read while matching.
    pub dependencies: Dependencies,
}

/// Match `pattern` against the filesystem.
///
/// The mode is decided by looking at the path first, so an existing file or
/// directory whose name contains glob characters is taken literally:
///
/// * File: the single file, relative path is its base name
/// * Directory: every file beneath it, dotfiles included, relative to it
/// * Glob: every path beneath the glob root matching the glob, relative to the context
///
/// The ignore list is matched against relative paths in every mode.
///
/// # Errors
///
/// * If a directory cannot be walked
/// * If the source's metadata cannot be read for a reason other than absence
/// * If `from` is neither an existing path nor a valid glob
pub fn match_pattern(pattern: &Pattern) -> Result<PatternMatches, ResolveError> {
    let mode = detect_mode(pattern)?;

    log::debug!(
        "Pattern #{}: '{}' is {mode:?}",
        pattern.index,
        pattern.from
    );

    let mut dependencies = Dependencies::new();

    let entries = match mode {
        MatchMode::File => match_file(pattern, &mut dependencies)?,
        MatchMode::Directory => match_directory(pattern, &mut dependencies)?,
        MatchMode::Glob => match_glob(pattern, &mut dependencies)?,
        MatchMode::Missing => {
            dependencies.add_file(&pattern.absolute_from);
            Vec::new()
        }
    };

    log::debug!(
        "Pattern #{}: found {} path(s)",
        pattern.index,
        entries.len()
    );

    Ok(PatternMatches {
        mode,
        entries,
        dependencies,
    })
}

/// Run the pattern's filter over `entries`.
///
/// Returns the accepted entries and one error per entry the filter failed on.
#[must_use]
pub fn filter_entries(
    pattern: &Pattern,
    entries: Vec<MatchedEntry>,
) -> (Vec<MatchedEntry>, Vec<PatternError>) {
    let Some(filter) = &pattern.filter else {
        return (entries, Vec::new());
    };

    let mut accepted = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for entry in entries {
        match filter(entry.absolute_path.as_path()) {
            Ok(true) => accepted.push(entry),
            Ok(false) => log::trace!("Filtered out {}", entry.absolute_path.display()),
            Err(e) => errors.push(PatternError::Transform {
                index: pattern.index,
                path: entry.absolute_path,
                message: e.to_string(),
            }),
        }
    }

    (accepted, errors)
}

fn detect_mode(pattern: &Pattern) -> Result<MatchMode, ResolveError> {
    match fs::metadata(&pattern.absolute_from) {
        Ok(metadata) if metadata.is_dir() => Ok(MatchMode::Directory),
        Ok(metadata) if metadata.is_file() => Ok(MatchMode::File),
        Ok(_) => {
            log::debug!(
                "{} is neither a file nor a directory",
                pattern.absolute_from.display()
            );
            Ok(MatchMode::Missing)
        }
        Err(_) if pattern.is_glob => Ok(MatchMode::Glob),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            Ok(MatchMode::Missing)
        }
        Err(e) => Err(ResolveError::Metadata {
            path: pattern.absolute_from.clone(),
            io_error: e,
        }),
    }
}

fn compile(
    pattern: &Pattern,
    glob: &str,
    options: &MatcherOptions,
) -> Result<PatternMatcher, ResolveError> {
    PatternMatcher::new(glob, options).map_err(|source| {
        ResolveError::Config(ConfigError::InvalidGlob {
            index: pattern.index,
            source,
        })
    })
}

fn match_file(
    pattern: &Pattern,
    dependencies: &mut Dependencies,
) -> Result<Vec<MatchedEntry>, ResolveError> {
    dependencies.add_file(&pattern.absolute_from);

    let relative_path = pattern
        .absolute_from
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let matcher = compile(pattern, "**", &pattern.matcher_options())?;
    if matcher.is_ignored(&relative_path) {
        log::trace!("Ignored {relative_path}");
        return Ok(Vec::new());
    }

    Ok(vec![MatchedEntry {
        absolute_path: pattern.absolute_from.clone(),
        relative_path,
        is_dir: false,
    }])
}

fn match_directory(
    pattern: &Pattern,
    dependencies: &mut Dependencies,
) -> Result<Vec<MatchedEntry>, ResolveError> {
    let options = MatcherOptions {
        dot: true,
        ..pattern.matcher_options()
    };
    let matcher = compile(pattern, "**", &options)?;

    let walked = walk(&pattern.absolute_from)?;
    dependencies.add_directory(&pattern.absolute_from);
    for directory in walked.directories {
        dependencies.add_directory(directory);
    }

    Ok(walked
        .entries
        .into_iter()
        .filter(|entry| !entry.is_dir && matcher.is_match(&entry.relative))
        .map(|entry| MatchedEntry {
            absolute_path: entry.path,
            relative_path: entry.relative,
            is_dir: false,
        })
        .collect())
}

fn match_glob(
    pattern: &Pattern,
    dependencies: &mut Dependencies,
) -> Result<Vec<MatchedEntry>, ResolveError> {
    let matcher = compile(pattern, &pattern.from, &pattern.matcher_options())?;

    let root = glob_root(&pattern.from);
    let root_path = path_clean::clean(pattern.context.join(&root));

    dependencies.add_directory(&root_path);

    let walked = walk(&root_path)?;
    for directory in walked.directories {
        dependencies.add_directory(directory);
    }

    let only_files = pattern.glob_options.only_files;
    let mut entries: Vec<MatchedEntry> = walked
        .entries
        .into_iter()
        .filter(|entry| !(only_files && entry.is_dir))
        .filter_map(|entry| {
            let relative = join_relative(&root, &entry.relative);
            matcher.is_match(&relative).then(|| MatchedEntry {
                absolute_path: entry.path,
                relative_path: relative,
                is_dir: entry.is_dir,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(entries)
}

fn join_relative(root: &str, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    if root.is_empty() || root == "." {
        relative.to_string()
    } else {
        format!("{root}/{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use assetcopy_config::{GlobOptions, RawPattern, ResolveOptions, normalize_pattern};
    use assetcopy_glob::to_slash;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("directory/nested/deep-nested")).unwrap();
        fs::write(root.join("file.txt"), "new").unwrap();
        fs::write(root.join(".dottedfile"), "dottedfile contents").unwrap();
        fs::write(root.join("directory/directoryfile.txt"), "new").unwrap();
        fs::write(root.join("directory/.dottedfile"), "dottedfile contents").unwrap();
        fs::write(root.join("directory/nested/nestedfile.txt"), "").unwrap();
        fs::write(
            root.join("directory/nested/deep-nested/deepnested.txt"),
            "",
        )
        .unwrap();
        dir
    }

    fn normalized(raw: RawPattern, base: &Path) -> Pattern {
        normalize_pattern(0, &raw, base, &ResolveOptions::default()).unwrap()
    }

    fn relative_paths(matches: &PatternMatches) -> Vec<&str> {
        matches
            .entries
            .iter()
            .map(|entry| entry.relative_path.as_str())
            .collect()
    }

    #[test]
    fn test_file_mode() {
        let dir = fixture();
        let pattern = normalized(RawPattern::new("directory/directoryfile.txt"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::File);
        assert_eq!(relative_paths(&matches), vec!["directoryfile.txt"]);

        let (files, directories) = matches.dependencies.into_sets();
        assert!(files.contains(&dir.path().join("directory/directoryfile.txt")));
        assert!(directories.is_empty());
    }

    #[test]
    fn test_directory_mode_includes_dotfiles() {
        let dir = fixture();
        let pattern = normalized(RawPattern::new("directory"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::Directory);
        assert_eq!(
            relative_paths(&matches),
            vec![
                ".dottedfile",
                "directoryfile.txt",
                "nested/deep-nested/deepnested.txt",
                "nested/nestedfile.txt",
            ]
        );

        let (files, directories) = matches.dependencies.into_sets();
        assert!(files.is_empty());
        assert!(directories.contains(&dir.path().join("directory")));
        assert!(directories.contains(&dir.path().join("directory/nested/deep-nested")));
    }

    #[test]
    fn test_directory_mode_honours_ignore() {
        let dir = fixture();
        let pattern = normalized(
            RawPattern::new("directory").glob_options(GlobOptions {
                ignore: vec!["**/nested/**".to_string()],
                ..GlobOptions::default()
            }),
            dir.path(),
        );

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(
            relative_paths(&matches),
            vec![".dottedfile", "directoryfile.txt"]
        );
    }

    #[test]
    fn test_glob_mode_skips_dotfiles() {
        let dir = fixture();
        let pattern = normalized(RawPattern::new("*"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::Glob);
        assert_eq!(relative_paths(&matches), vec!["file.txt"]);
    }

    #[test]
    fn test_glob_mode_with_dot() {
        let dir = fixture();
        let pattern = normalized(
            RawPattern::new("*").glob_options(GlobOptions {
                dot: true,
                ..GlobOptions::default()
            }),
            dir.path(),
        );

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(relative_paths(&matches), vec![".dottedfile", "file.txt"]);
    }

    #[test]
    fn test_glob_mode_keeps_root_prefix() {
        let dir = fixture();
        let pattern = normalized(RawPattern::new("directory/**/*.txt"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(
            relative_paths(&matches),
            vec![
                "directory/directoryfile.txt",
                "directory/nested/deep-nested/deepnested.txt",
                "directory/nested/nestedfile.txt",
            ]
        );

        let (_, directories) = matches.dependencies.into_sets();
        assert!(directories.contains(&dir.path().join("directory")));
        assert!(!directories.contains(dir.path()));
    }

    #[test]
    fn test_glob_mode_negated_segment() {
        let dir = fixture();
        fs::create_dir_all(dir.path().join("other")).unwrap();
        fs::write(dir.path().join("other/kept.txt"), "").unwrap();
        let pattern = normalized(RawPattern::new("!(directory)/**/*.txt"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(relative_paths(&matches), vec!["other/kept.txt"]);
        assert!(
            matches
                .entries
                .iter()
                .all(|entry| !entry.relative_path.starts_with("directory/"))
        );
    }

    #[test]
    fn test_glob_mode_directories_when_only_files_is_off() {
        let dir = fixture();
        let pattern = normalized(
            RawPattern::new("directory/*").glob_options(GlobOptions {
                only_files: false,
                ..GlobOptions::default()
            }),
            dir.path(),
        );

        let matches = match_pattern(&pattern).unwrap();

        let nested = matches
            .entries
            .iter()
            .find(|entry| entry.relative_path == "directory/nested")
            .unwrap();
        assert!(nested.is_dir);
    }

    #[test]
    fn test_missing_literal_path() {
        let dir = fixture();
        let pattern = normalized(RawPattern::new("nonexistent.txt"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::Missing);
        assert!(matches.entries.is_empty());
    }

    #[test]
    fn test_literal_name_with_glob_characters() {
        let dir = fixture();
        fs::write(dir.path().join("[id]-{x}.txt"), "literal").unwrap();
        let pattern = normalized(RawPattern::new("[id]-{x}.txt"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::File);
        assert_eq!(relative_paths(&matches), vec!["[id]-{x}.txt"]);
    }

    #[test]
    fn test_literal_name_that_is_not_a_valid_glob() {
        let dir = fixture();
        fs::write(dir.path().join("[a-"), "literal").unwrap();
        let pattern = normalized(RawPattern::new("[a-"), dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::File);
        assert_eq!(relative_paths(&matches), vec!["[a-"]);
    }

    #[test]
    fn test_invalid_glob_without_literal_path() {
        let dir = fixture();
        let pattern = normalized(RawPattern::new("assets/[a-"), dir.path());

        let err = match_pattern(&pattern).unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Config(ConfigError::InvalidGlob { index: 0, .. })
        ));
    }

    #[test]
    fn test_absolute_glob_outside_explicit_context() {
        let dir = fixture();
        let from = format!("{}/directory/*.txt", to_slash(dir.path()));
        let raw = RawPattern::new(from).context(dir.path().join("dir"));
        let pattern = normalized(raw, dir.path());

        let matches = match_pattern(&pattern).unwrap();

        assert_eq!(matches.mode, MatchMode::Glob);
        assert_eq!(relative_paths(&matches), vec!["directoryfile.txt"]);
    }

    #[test]
    fn test_filter_entries() {
        let dir = fixture();
        let pattern = normalized(
            RawPattern::new("directory").filter(|path: &Path| {
                if path.ends_with("nestedfile.txt") {
                    return Err("cannot decide".into());
                }
                Ok(path.extension().is_some_and(|ext| ext == "txt"))
            }),
            dir.path(),
        );

        let matches = match_pattern(&pattern).unwrap();
        let (accepted, errors) = filter_entries(&pattern, matches.entries);

        let accepted: Vec<_> = accepted.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(
            accepted,
            vec!["directoryfile.txt", "nested/deep-nested/deepnested.txt"]
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], PatternError::Transform { message, .. } if message == "cannot decide"));
    }
}
