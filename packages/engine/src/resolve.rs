//! The resolve entry point.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use assetcopy_cache::CacheBackend;
use assetcopy_config::{Pattern, RawPattern, ResolveOptions, normalize_patterns};
use assetcopy_copy::{ContentError, ContentLoader, RunStats, StatsTracker, pattern_salt};
use assetcopy_glob::to_slash;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::dependencies::Dependencies;
use crate::error::{PatternError, ResolveError, Warning};
use crate::host::AssetStore;
use crate::matcher::{MatchedEntry, filter_entries, match_pattern};
use crate::reconcile::{EmissionRecord, Reconciler, ResolvedEntry};
use crate::template::render_destination;

/// Result of a resolve run.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutput {
    /// Assets to emit, unique by destination.
    pub emissions: Vec<EmissionRecord>,
    /// Single files to watch.
    pub file_dependencies: BTreeSet<PathBuf>,
    /// Directories to watch, including glob roots.
    pub directory_dependencies: BTreeSet<PathBuf>,
    /// Non-fatal conditions.
    pub warnings: Vec<Warning>,
    /// Pattern- and entry-scoped errors.
    pub errors: Vec<PatternError>,
    /// Counters of the run.
    pub stats: RunStats,
}

/// Resolves copy patterns into emission records.
///
/// A resolver borrows the host's cache backend and output set and can be
/// reused across runs; cache records written by one run serve the next.
pub struct Resolver<'a> {
    cache: &'a dyn CacheBackend,
    assets: &'a dyn AssetStore,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    /// Create a resolver.
    ///
    /// # Arguments
    ///
    /// * `cache` - Persistent cache for source content
    /// * `assets` - Destinations already present in the output
    /// * `options` - Concurrency, digest length and output path
    #[must_use]
    pub fn new(
        cache: &'a dyn CacheBackend,
        assets: &'a dyn AssetStore,
        options: ResolveOptions,
    ) -> Self {
        Self {
            cache,
            assets,
            options,
        }
    }

    /// Resolve `patterns` against `base_context`.
    ///
    /// Patterns are reconciled in ascending priority, declaration order
    /// breaking ties. The output is the same for a given filesystem state and
    /// pattern list regardless of concurrency.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::Config`] if `base_context` is relative or any pattern is invalid
    /// * [`ResolveError::Walk`] if a directory cannot be read
    /// * [`ResolveError::Content`] or [`ResolveError::Metadata`] if a source
    ///   exists but cannot be read
    pub fn resolve(
        &self,
        patterns: &[RawPattern],
        base_context: &Path,
    ) -> Result<ResolveOutput, ResolveError> {
        log::debug!(
            "Resolving {} pattern(s) in {}",
            patterns.len(),
            base_context.display()
        );

        let mut patterns = normalize_patterns(patterns, base_context, &self.options)?;
        patterns.sort_by_key(|pattern| pattern.priority);

        let stats = StatsTracker::new();
        let run = Run {
            loader: ContentLoader::new(self.cache, &stats),
            base_context,
            digest_length: self.options.hash_digest_length,
        };

        let outcomes = run.resolve_all(&patterns, self.options.worker_limit())?;

        let mut dependencies = Dependencies::new();
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut reconciler = Reconciler::new(self.assets, &stats);

        for outcome in outcomes {
            dependencies.extend(outcome.dependencies);
            warnings.extend(outcome.warnings);
            errors.extend(outcome.errors);
            for entry in outcome.resolved {
                reconciler.add(entry);
            }
        }

        let (emissions, conflicts) = reconciler.finish();
        warnings.extend(conflicts);

        let (file_dependencies, directory_dependencies) = dependencies.into_sets();
        let stats = stats.snapshot();

        log::debug!(
            "Resolved {} asset(s): {} cached, {} read, {} skipped, {} error(s), {} warning(s)",
            stats.emitted,
            stats.cache_hits,
            stats.fresh_reads,
            stats.skipped,
            errors.len(),
            warnings.len()
        );

        Ok(ResolveOutput {
            emissions,
            file_dependencies,
            directory_dependencies,
            warnings,
            errors,
            stats,
        })
    }
}

#[derive(Default)]
struct PatternOutcome {
    resolved: Vec<ResolvedEntry>,
    dependencies: Dependencies,
    warnings: Vec<Warning>,
    errors: Vec<PatternError>,
}

enum EntryOutcome {
    Resolved(Box<ResolvedEntry>),
    Failed(PatternError),
    Vanished,
}

struct Run<'a> {
    loader: ContentLoader<'a>,
    base_context: &'a Path,
    digest_length: usize,
}

/// A pattern whose matches are known but not yet loaded.
struct MatchedPattern<'p> {
    pattern: &'p Pattern,
    files: Vec<MatchedEntry>,
    outcome: PatternOutcome,
}

impl Run<'_> {
    /// Match every pattern on the calling thread, then load the matches on a
    /// pool of `workers` threads.
    fn resolve_all(
        &self,
        patterns: &[Pattern],
        workers: usize,
    ) -> Result<Vec<PatternOutcome>, ResolveError> {
        let matched = patterns
            .iter()
            .map(match_files)
            .collect::<Result<Vec<_>, _>>()?;

        if workers <= 1 {
            return self.load_serial(matched);
        }

        let pool = match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool,
            Err(e) => {
                log::warn!("Failed to build a pool of {workers} workers, resolving serially: {e}");
                return self.load_serial(matched);
            }
        };

        pool.install(|| {
            matched
                .into_par_iter()
                .map(|pattern| self.load_pattern(pattern, true))
                .collect()
        })
    }

    fn load_serial(
        &self,
        matched: Vec<MatchedPattern<'_>>,
    ) -> Result<Vec<PatternOutcome>, ResolveError> {
        matched
            .into_iter()
            .map(|pattern| self.load_pattern(pattern, false))
            .collect()
    }

    fn load_pattern(
        &self,
        matched: MatchedPattern<'_>,
        parallel: bool,
    ) -> Result<PatternOutcome, ResolveError> {
        let MatchedPattern {
            pattern,
            files,
            mut outcome,
        } = matched;

        if files.is_empty() {
            return Ok(outcome);
        }

        let salt = pattern_salt(&pattern.glob_options, pattern.transform.as_ref());

        let results: Vec<_> = if parallel {
            files
                .par_iter()
                .map(|entry| self.resolve_entry(pattern, entry, &salt))
                .collect()
        } else {
            files
                .iter()
                .map(|entry| self.resolve_entry(pattern, entry, &salt))
                .collect()
        };

        for result in results {
            match result? {
                EntryOutcome::Resolved(entry) => outcome.resolved.push(*entry),
                EntryOutcome::Failed(error) => outcome.errors.push(error),
                EntryOutcome::Vanished => {}
            }
        }

        Ok(outcome)
    }

    fn resolve_entry(
        &self,
        pattern: &Pattern,
        entry: &MatchedEntry,
        salt: &str,
    ) -> Result<EntryOutcome, ResolveError> {
        let transform = pattern.transform.as_ref();
        let loaded = match self.loader.load(&entry.absolute_path, salt, transform) {
            Ok(loaded) => loaded,
            Err(ContentError::Missing { path }) => {
                log::debug!("{} disappeared before it was read", path.display());
                return Ok(EntryOutcome::Vanished);
            }
            Err(ContentError::TransformError { path, message }) => {
                return Ok(EntryOutcome::Failed(PatternError::Transform {
                    index: pattern.index,
                    path,
                    message,
                }));
            }
            Err(e) => return Err(ResolveError::Content(e)),
        };

        let destination = match render_destination(pattern, entry, &loaded.hash, self.digest_length)
        {
            Ok(destination) => destination,
            Err(e) => {
                return Ok(EntryOutcome::Failed(PatternError::Transform {
                    index: pattern.index,
                    path: entry.absolute_path.clone(),
                    message: e.to_string(),
                }));
            }
        };

        let source_filename = entry
            .absolute_path
            .strip_prefix(self.base_context)
            .map_or_else(|_| to_slash(&entry.absolute_path), to_slash);

        Ok(EntryOutcome::Resolved(Box::new(ResolvedEntry {
            pattern_index: pattern.index,
            force: pattern.force,
            source: entry.absolute_path.clone(),
            source_filename,
            destination: destination.path,
            immutable: destination.immutable,
            content: loaded.content,
            hash: loaded.hash,
            info: pattern.info.clone(),
        })))
    }
}

fn match_files(pattern: &Pattern) -> Result<MatchedPattern<'_>, ResolveError> {
    log::debug!("Processing pattern #{}: '{}'", pattern.index, pattern.from);

    let matches = match_pattern(pattern)?;
    let (entries, errors) = filter_entries(pattern, matches.entries);

    let mut outcome = PatternOutcome {
        dependencies: matches.dependencies,
        errors,
        ..PatternOutcome::default()
    };

    if entries.is_empty() {
        if outcome.errors.is_empty() {
            report_missing(pattern, &mut outcome);
        }
        return Ok(MatchedPattern {
            pattern,
            files: Vec::new(),
            outcome,
        });
    }

    let (directories, files): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| entry.is_dir);
    for directory in directories {
        log::trace!("Not emitting directory {}", directory.absolute_path.display());
    }

    Ok(MatchedPattern {
        pattern,
        files,
        outcome,
    })
}

fn report_missing(pattern: &Pattern, outcome: &mut PatternOutcome) {
    let path = pattern.absolute_from.clone();

    if pattern.no_error_on_missing {
        log::debug!("Pattern #{}: nothing matched, ignoring", pattern.index);
        outcome.warnings.push(Warning::MissingSource {
            index: pattern.index,
            from: pattern.from.clone(),
            path,
        });
    } else {
        outcome.errors.push(PatternError::NotFound {
            index: pattern.index,
            from: pattern.from.clone(),
            path,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::fs;

    use assetcopy_cache::{FsCache, MemoryCache, NullCache};
    use assetcopy_config::{ConfigError, GlobOptions, HookError};
    use assetcopy_copy::ContentHash;
    use filetime::FileTime;
    use tempfile::TempDir;

    use crate::host::NoAssets;

    const OLD_MTIME: i64 = 1_600_000_000;

    fn write_old(path: &Path, content: &str) {
        write_at(path, content, OLD_MTIME);
    }

    fn write_at(path: &Path, content: &str, mtime_secs: i64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        filetime::set_file_mtime(path, FileTime::from_unix_time(mtime_secs, 0)).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_old(&root.join("file.txt"), "new");
        write_old(&root.join(".dottedfile"), "dottedfile contents");
        write_old(&root.join("directory/directoryfile.txt"), "new");
        write_old(&root.join("directory/.dottedfile"), "dottedfile contents");
        write_old(&root.join("directory/nested/nestedfile.txt"), "");
        write_old(&root.join("directory/nested/deep-nested/deepnested.txt"), "");
        write_old(&root.join("other/otherfile.txt"), "other");
        dir
    }

    fn options(concurrency: usize) -> ResolveOptions {
        ResolveOptions {
            concurrency: Some(concurrency),
            ..ResolveOptions::default()
        }
    }

    fn run(patterns: &[RawPattern], base: &Path) -> ResolveOutput {
        Resolver::new(&NullCache, &NoAssets, options(4))
            .resolve(patterns, base)
            .unwrap()
    }

    fn emitted(output: &ResolveOutput) -> BTreeMap<String, String> {
        output
            .emissions
            .iter()
            .map(|e| {
                (
                    e.destination.clone(),
                    String::from_utf8(e.content.clone()).unwrap(),
                )
            })
            .collect()
    }

    fn destinations(output: &ResolveOutput) -> Vec<&str> {
        output
            .emissions
            .iter()
            .map(|e| e.destination.as_str())
            .collect()
    }

    #[test]
    fn test_single_file_emits_basename() {
        let dir = fixture();
        let output = run(&[RawPattern::new("directory/directoryfile.txt")], dir.path());

        assert_eq!(
            emitted(&output),
            BTreeMap::from([("directoryfile.txt".to_string(), "new".to_string())])
        );
        assert!(output.errors.is_empty());
        assert_eq!(
            output.file_dependencies,
            BTreeSet::from([dir.path().join("directory/directoryfile.txt")])
        );
        assert!(output.directory_dependencies.is_empty());
    }

    #[test]
    fn test_absolute_file_emits_basename() {
        let dir = fixture();
        let absolute = dir.path().join("directory/directoryfile.txt");
        let output = run(
            &[RawPattern::new(absolute.to_string_lossy().into_owned())],
            dir.path(),
        );

        assert_eq!(destinations(&output), vec!["directoryfile.txt"]);
    }

    #[test]
    fn test_directory_preserves_structure() {
        let dir = fixture();
        let output = run(&[RawPattern::new("directory")], dir.path());

        assert_eq!(
            destinations(&output),
            vec![
                ".dottedfile",
                "directoryfile.txt",
                "nested/deep-nested/deepnested.txt",
                "nested/nestedfile.txt",
            ]
        );
        assert!(
            output
                .directory_dependencies
                .contains(&dir.path().join("directory"))
        );
        assert!(
            output
                .directory_dependencies
                .contains(&dir.path().join("directory/nested"))
        );
        assert!(output.file_dependencies.is_empty());
    }

    #[test]
    fn test_negated_glob_excludes_directory() {
        let dir = fixture();
        let output = run(&[RawPattern::new("!(directory)/**/*.txt")], dir.path());

        assert_eq!(destinations(&output), vec!["other/otherfile.txt"]);
        assert!(
            output
                .emissions
                .iter()
                .all(|e| !e.destination.starts_with("directory/"))
        );
    }

    #[test]
    fn test_glob_keeps_context_relative_paths() {
        let dir = fixture();
        let output = run(&[RawPattern::new("directory/**/*")], dir.path());

        assert_eq!(
            destinations(&output),
            vec![
                "directory/directoryfile.txt",
                "directory/nested/deep-nested/deepnested.txt",
                "directory/nested/nestedfile.txt",
            ]
        );
    }

    #[test]
    fn test_same_source_different_destinations() {
        let dir = fixture();
        let output = run(
            &[
                RawPattern::new("file.txt").to("first/"),
                RawPattern::new("file.txt").to("second/"),
            ],
            dir.path(),
        );

        assert_eq!(
            emitted(&output),
            BTreeMap::from([
                ("first/file.txt".to_string(), "new".to_string()),
                ("second/file.txt".to_string(), "new".to_string()),
            ])
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_content_hash_template_is_stable_and_cached() {
        let dir = fixture();
        let cache = MemoryCache::new();
        let resolver = Resolver::new(&cache, &NoAssets, options(4));
        let patterns = [RawPattern::new("file.txt").to("[path][name].[contenthash].[ext]")];

        let first = resolver.resolve(&patterns, dir.path()).unwrap();
        let expected = format!("file.{}.txt", ContentHash::of(b"new").prefix(20));
        assert_eq!(destinations(&first), vec![expected.as_str()]);
        assert!(first.emissions[0].info.immutable);
        assert_eq!(first.stats.fresh_reads, 1);

        let second = resolver.resolve(&patterns, dir.path()).unwrap();
        assert_eq!(destinations(&second), vec![expected.as_str()]);
        assert_eq!(second.stats.fresh_reads, 0);
        assert_eq!(second.stats.cache_hits, 1);

        write_at(&dir.path().join("file.txt"), "changed", OLD_MTIME + 100);
        let third = resolver.resolve(&patterns, dir.path()).unwrap();
        let changed = format!("file.{}.txt", ContentHash::of(b"changed").prefix(20));
        assert_eq!(destinations(&third), vec![changed.as_str()]);
        assert!(third.emissions[0].info.immutable);
        assert_eq!(third.stats.fresh_reads, 1);
    }

    #[test]
    fn test_second_run_is_served_from_cache() {
        let dir = fixture();
        let cache_dir = TempDir::new().unwrap();
        let cache = FsCache::new(cache_dir.path());
        let patterns = [
            RawPattern::new("directory"),
            RawPattern::new("*.txt").to("root/"),
        ];

        let first = Resolver::new(&cache, &NoAssets, options(4))
            .resolve(&patterns, dir.path())
            .unwrap();
        assert_eq!(first.stats.fresh_reads, 5);
        assert_eq!(first.stats.cache_hits, 0);

        let second = Resolver::new(&cache, &NoAssets, options(4))
            .resolve(&patterns, dir.path())
            .unwrap();
        assert_eq!(second.stats.fresh_reads, 0);
        assert_eq!(second.stats.cache_hits, 5);
        assert_eq!(second.emissions, first.emissions);
    }

    #[test]
    fn test_new_file_in_watched_directory_is_picked_up() {
        let dir = fixture();
        let patterns = [
            RawPattern::new("directory"),
            RawPattern::new("other/**/*.txt"),
        ];

        let first = run(&patterns, dir.path());
        assert!(
            first
                .directory_dependencies
                .contains(&dir.path().join("directory/nested"))
        );
        assert!(!first.directory_dependencies.contains(dir.path()));

        write_old(&dir.path().join("directory/nested/added.txt"), "added");
        write_old(&dir.path().join("outside.txt"), "outside");

        let second = run(&patterns, dir.path());
        let mut expected = emitted(&first);
        expected.insert("nested/added.txt".to_string(), "added".to_string());

        assert_eq!(emitted(&second), expected);
    }

    #[test]
    fn test_existing_asset_without_force_is_skipped() {
        let dir = fixture();
        let assets: HashSet<String> = HashSet::from(["file.txt".to_string()]);

        let output = Resolver::new(&NullCache, &assets, options(4))
            .resolve(&[RawPattern::new("file.txt")], dir.path())
            .unwrap();

        assert!(output.emissions.is_empty());
        assert!(output.errors.is_empty());
        assert!(output.warnings.is_empty());
        assert_eq!(output.stats.skipped, 1);

        let forced = Resolver::new(&NullCache, &assets, options(4))
            .resolve(&[RawPattern::new("file.txt").force(true)], dir.path())
            .unwrap();

        assert_eq!(destinations(&forced), vec!["file.txt"]);
        assert!(forced.emissions[0].replaces_existing);
    }

    #[test]
    fn test_conflict_keeps_first_pattern() {
        let dir = fixture();
        let output = run(
            &[
                RawPattern::new("file.txt"),
                RawPattern::new("other/otherfile.txt").to("file.txt"),
            ],
            dir.path(),
        );

        assert_eq!(
            emitted(&output),
            BTreeMap::from([("file.txt".to_string(), "new".to_string())])
        );
        assert!(matches!(
            output.warnings.as_slice(),
            [Warning::Conflict { destination, .. }] if destination == "file.txt"
        ));
    }

    #[test]
    fn test_priority_orders_reconciliation() {
        let dir = fixture();
        let output = run(
            &[
                RawPattern::new("other/otherfile.txt")
                    .to("file.txt")
                    .force(true)
                    .priority(10),
                RawPattern::new("file.txt"),
            ],
            dir.path(),
        );

        assert_eq!(
            emitted(&output),
            BTreeMap::from([("file.txt".to_string(), "other".to_string())])
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_missing_source_is_scoped_to_its_pattern() {
        let dir = fixture();
        let output = run(
            &[RawPattern::new("nonexistent.txt"), RawPattern::new("file.txt")],
            dir.path(),
        );

        assert_eq!(destinations(&output), vec!["file.txt"]);
        assert_eq!(
            output.errors,
            vec![PatternError::NotFound {
                index: 0,
                from: "nonexistent.txt".to_string(),
                path: dir.path().join("nonexistent.txt"),
            }]
        );
    }

    #[test]
    fn test_missing_source_with_no_error_on_missing() {
        let dir = fixture();
        let output = run(
            &[RawPattern::new("nonexistent/**/*.txt").no_error_on_missing(true)],
            dir.path(),
        );

        assert!(output.emissions.is_empty());
        assert!(output.errors.is_empty());
        assert!(matches!(
            output.warnings.as_slice(),
            [Warning::MissingSource { index: 0, .. }]
        ));
        assert!(
            output
                .directory_dependencies
                .contains(&dir.path().join("nonexistent"))
        );
    }

    #[test]
    fn test_transform_failure_is_scoped_to_its_entry() {
        let dir = fixture();
        let output = run(
            &[RawPattern::new("directory/**/*.txt").transform(|bytes: &[u8], path: &Path| {
                if path.ends_with("nestedfile.txt") {
                    return Err::<Vec<u8>, HookError>("broken".into());
                }
                Ok(bytes.to_ascii_uppercase())
            })],
            dir.path(),
        );

        assert_eq!(
            emitted(&output),
            BTreeMap::from([
                ("directory/directoryfile.txt".to_string(), "NEW".to_string()),
                (
                    "directory/nested/deep-nested/deepnested.txt".to_string(),
                    String::new()
                ),
            ])
        );
        assert!(matches!(
            output.errors.as_slice(),
            [PatternError::Transform { message, .. }] if message == "broken"
        ));
    }

    #[test]
    fn test_cached_transform_runs_once_across_runs() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let dir = fixture();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let patterns = [RawPattern::new("file.txt").transform_cached(
            "upper-v1",
            move |bytes: &[u8], _: &Path| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(bytes.to_ascii_uppercase())
            },
        )];

        let cache = MemoryCache::new();
        let resolver = Resolver::new(&cache, &NoAssets, options(4));
        let first = resolver.resolve(&patterns, dir.path()).unwrap();
        let second = resolver.resolve(&patterns, dir.path()).unwrap();

        assert_eq!(emitted(&second)["file.txt"], "NEW");
        assert_eq!(second.emissions, first.emissions);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_info_and_source_filename() {
        let dir = fixture();
        let output = run(
            &[RawPattern::new("directory/directoryfile.txt")
                .info("minimized", serde_json::json!(true))],
            dir.path(),
        );

        let info = &output.emissions[0].info;
        assert!(info.copied);
        assert!(!info.immutable);
        assert_eq!(info.source_filename, "directory/directoryfile.txt");
        assert_eq!(info.extra["minimized"], serde_json::json!(true));
    }

    #[test]
    fn test_concurrency_does_not_change_output() {
        let dir = fixture();
        let patterns = [
            RawPattern::new("directory").to("a/"),
            RawPattern::new("**/*.txt").to("b/"),
            RawPattern::new("file.txt").to("[name].[contenthash:8].[ext]"),
            RawPattern::new("missing.txt"),
        ];

        let serial = Resolver::new(&NullCache, &NoAssets, options(1))
            .resolve(&patterns, dir.path())
            .unwrap();
        let parallel = Resolver::new(&NullCache, &NoAssets, options(8))
            .resolve(&patterns, dir.path())
            .unwrap();

        assert_eq!(serial.emissions, parallel.emissions);
        assert_eq!(serial.errors, parallel.errors);
        assert_eq!(serial.warnings, parallel.warnings);
        assert_eq!(serial.file_dependencies, parallel.file_dependencies);
        assert_eq!(serial.directory_dependencies, parallel.directory_dependencies);
    }

    #[test]
    fn test_more_walking_patterns_than_workers() {
        let dir = TempDir::new().unwrap();
        let mut patterns = Vec::new();
        for d in 0..6 {
            for s in 0..20 {
                write_old(&dir.path().join(format!("d{d}/s{s}/file.txt")), "x");
            }
            patterns.push(RawPattern::new(format!("d{d}")).to(format!("d{d}/")));
            patterns.push(RawPattern::new(format!("d{d}/**/*.txt")).to(format!("g{d}/")));
        }

        for concurrency in [1, 2, 3] {
            let output = Resolver::new(&NullCache, &NoAssets, options(concurrency))
                .resolve(&patterns, dir.path())
                .unwrap();

            assert_eq!(output.emissions.len(), 6 * 20 * 2);
            assert!(output.errors.is_empty());
        }
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let dir = fixture();
        let err = Resolver::new(&NullCache, &NoAssets, options(4))
            .resolve(&[RawPattern::new("file.txt"), RawPattern::new("")], dir.path())
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Config(ConfigError::MissingFrom { index: 1 })
        ));
    }

    #[test]
    fn test_relative_base_context_is_fatal() {
        let err = Resolver::new(&NullCache, &NoAssets, options(4))
            .resolve(&[RawPattern::new("file.txt")], Path::new("relative"))
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Config(ConfigError::RelativeBaseContext(_))
        ));
    }

    #[test]
    fn test_filter_limits_matches() {
        let dir = fixture();
        let output = run(
            &[RawPattern::new("directory").filter(|path: &Path| {
                Ok(!path.to_string_lossy().contains("nested"))
            })],
            dir.path(),
        );

        assert_eq!(
            destinations(&output),
            vec![".dottedfile", "directoryfile.txt"]
        );
    }

    #[test]
    fn test_only_files_off_still_emits_files() {
        let dir = fixture();
        let output = run(
            &[RawPattern::new("directory/*").glob_options(GlobOptions {
                only_files: false,
                ..GlobOptions::default()
            })],
            dir.path(),
        );

        assert_eq!(destinations(&output), vec!["directory/directoryfile.txt"]);
        assert!(output.errors.is_empty());
    }
}
