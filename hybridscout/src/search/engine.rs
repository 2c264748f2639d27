use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::processor::FileProcessor;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::filters::FileFilter;
use crate::results::{FileResult, SearchResult as SearchOutput};

/// Collects the files under `config.root_path` that pass the filters.
///
/// A root that is itself a file is returned as the only entry, without
/// filtering.
fn collect_files(config: &SearchConfig) -> SearchResult<Vec<PathBuf>> {
    let root = &config.root_path;
    if !root.exists() {
        return Err(SearchError::file_not_found(root));
    }
    if root.is_file() {
        return Ok(vec![root.clone()]);
    }

    let filter = FileFilter::new(config.file_extensions.clone(), &config.ignore_patterns);
    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(true)
        .ignore(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true);

    Ok(walker
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| filter.includes(entry.path()))
        .map(|entry| entry.into_path())
        .collect())
}

/// Searches every file under the configured root, in parallel.
///
/// Each file is cut into chunks and every chunk goes through the hybrid
/// matcher independently. Files that cannot be read are logged and skipped.
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutput> {
    info!(
        "Starting search for {:?} with tolerance {}",
        config.pattern, config.tolerance
    );
    config.validate()?;

    if config.pattern.is_empty() {
        debug!("Empty pattern, returning empty result");
        return Ok(SearchOutput::new());
    }

    let files = collect_files(config)?;
    debug!("Found {} files to process", files.len());

    let processor = FileProcessor::from_config(config);
    let metrics = processor.metrics().clone();

    let thread_count = config.thread_count.get();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| SearchError::config_error(format!("thread pool: {}", e)))?;

    // Files per rayon task
    let batch_size = (files.len() / thread_count).clamp(16, 256);

    let file_results: Vec<FileResult> = pool.install(|| {
        files
            .par_chunks(batch_size)
            .flat_map(|batch| {
                batch
                    .iter()
                    .filter_map(|path| match processor.process_file(path) {
                        Ok(result) => Some(result),
                        Err(e) => {
                            warn!("Skipping {}: {}", path.display(), e);
                            None
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    });

    let mut result = SearchOutput::new();
    for file_result in file_results {
        result.add_file_result(file_result);
    }

    metrics.log_stats();

    info!(
        "Search complete. Found {} matches in {} files",
        result.total_matches, result.files_with_matches
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::MatchKind;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    #[test]
    fn test_search_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "ababcababc").unwrap();
        std::fs::write(dir.path().join("b.txt"), "nothing to see").unwrap();

        let config = SearchConfig {
            thread_count: NonZeroUsize::new(1).unwrap(),
            ..SearchConfig::new("abc", 0, dir.path())
        };

        let result = search(&config).unwrap();
        assert_eq!(result.files_searched, 2);
        assert_eq!(result.files_with_matches, 1);
        assert_eq!(result.total_matches, 6);
        for kind in MatchKind::ALL {
            assert_eq!(result.kind_counts.get(kind), 2);
        }
    }

    #[test]
    fn test_search_single_file_root() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("only.txt");
        std::fs::write(&file_path, "aaaa").unwrap();

        let result = search(&SearchConfig::new("ab", 1, &file_path)).unwrap();
        assert_eq!(result.files_searched, 1);
        assert_eq!(result.kind_counts.approximate, 3);
        assert_eq!(result.kind_counts.exact_kmp, 0);
    }

    #[test]
    fn test_empty_pattern_returns_empty_result() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "text").unwrap();
        let result = search(&SearchConfig::new("", 0, dir.path())).unwrap();
        assert_eq!(result.files_searched, 0);
        assert_eq!(result.total_matches, 0);
    }

    #[test]
    fn test_filters_applied() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("keep.txt"), "needle").unwrap();
        std::fs::write(dir.path().join("skip.md"), "needle").unwrap();
        std::fs::write(dir.path().join("skip.tmp.txt"), "needle").unwrap();

        let config = SearchConfig {
            file_extensions: Some(vec!["txt".to_string()]),
            ignore_patterns: vec!["**/*.tmp.txt".to_string()],
            ..SearchConfig::new("needle", 0, dir.path())
        };
        let result = search(&config).unwrap();
        assert_eq!(result.files_searched, 1);
        assert!(result.file_results[0].path.ends_with("keep.txt"));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let config = SearchConfig::new("x", 0, dir.path().join("missing"));
        assert!(matches!(search(&config), Err(SearchError::FileNotFound(_))));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let dir = tempdir().unwrap();
        let config = SearchConfig {
            chunk_size: 0,
            ..SearchConfig::new("x", 0, dir.path())
        };
        assert!(matches!(search(&config), Err(SearchError::ConfigError(_))));
    }
}
