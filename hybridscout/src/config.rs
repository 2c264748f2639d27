use config::{Config as ConfigBuilder, File};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{validate_tolerance, SearchError, SearchResult};
use crate::search::approximate::ApproximateStrategy;

/// Default number of characters handed to the matchers at a time
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// How to handle invalid UTF-8 sequences in input files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Abort the file with an encoding error
    #[default]
    FailFast,
    /// Replace invalid sequences with U+FFFD and keep going
    Lossy,
}

/// What carries over from one chunk to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkOverlap {
    /// Chunks are searched in isolation; matches that straddle a boundary are missed
    #[default]
    None,
    /// The last `m - 1` characters of each chunk are prepended to the next one
    CarryTail,
}

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// Files are layered, later ones overriding earlier ones:
/// 1. Global `$CONFIG_DIR/hybridscout/config.yaml`
/// 2. Local `.hybridscout.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line values are applied last through [`SearchConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Text to look for (matched literally, not as a regex)
/// pattern: "needle"
///
/// # Maximum edit distance for approximate hits
/// tolerance: 1
///
/// # File or directory to search
/// root_path: "."
///
/// # File extensions to include
/// file_extensions: ["txt", "md"]
///
/// # Patterns to ignore (glob syntax)
/// ignore_patterns: ["target/**"]
///
/// # Characters per chunk, and whether chunks overlap
/// chunk_size: 1024
/// overlap: none          # none | carry-tail
///
/// # full | banded
/// approximate_strategy: full
///
/// thread_count: 4
/// log_level: "info"
/// encoding_mode: failfast  # failfast | lossy
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// The pattern to search for
    pub pattern: String,

    /// Maximum edit distance for an approximate match
    #[serde(deserialize_with = "deserialize_tolerance")]
    pub tolerance: usize,

    /// File or directory to search
    pub root_path: PathBuf,

    /// Optional list of file extensions to include (e.g., ["txt", "md"])
    /// If None, all file extensions are included
    pub file_extensions: Option<Vec<String>>,

    /// Patterns to ignore (supports glob syntax)
    pub ignore_patterns: Vec<String>,

    /// Number of characters in each unit of text given to the matchers
    pub chunk_size: usize,

    /// Whether chunks share a tail so boundary-spanning matches are found
    pub overlap: ChunkOverlap,

    /// Full or banded edit-distance computation
    pub approximate_strategy: ApproximateStrategy,

    /// Run the three matchers of each chunk concurrently
    pub parallel_matchers: bool,

    /// Whether to only show statistics instead of individual matches
    pub stats_only: bool,

    /// Number of threads to use for searching files
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// How to treat invalid UTF-8
    pub encoding_mode: EncodingMode,
}

// Read as signed so a negative value is reported instead of wrapping
fn deserialize_tolerance<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    validate_tolerance(raw).map_err(de::Error::custom)
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            tolerance: 0,
            root_path: PathBuf::from("."),
            file_extensions: None,
            ignore_patterns: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: ChunkOverlap::None,
            approximate_strategy: ApproximateStrategy::Full,
            parallel_matchers: false,
            stats_only: false,
            thread_count: default_thread_count(),
            log_level: default_log_level(),
            encoding_mode: EncodingMode::FailFast,
        }
    }
}

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub pattern: Option<String>,
    pub tolerance: Option<usize>,
    pub root_path: Option<PathBuf>,
    pub file_extensions: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub chunk_size: Option<usize>,
    pub overlap: Option<ChunkOverlap>,
    pub approximate_strategy: Option<ApproximateStrategy>,
    pub parallel_matchers: bool,
    pub stats_only: bool,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
    pub encoding_mode: Option<EncodingMode>,
}

impl SearchConfig {
    /// Creates a configuration for `pattern` under `root_path` with defaults elsewhere
    pub fn new(pattern: impl Into<String>, tolerance: usize, root_path: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            tolerance,
            root_path: root_path.into(),
            ..Self::default()
        }
    }

    /// Loads configuration, layering `config_path` over the default locations
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(SearchError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("hybridscout/config.yaml")),
            Some(PathBuf::from(".hybridscout.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SearchError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the search cannot run with
    pub fn validate(&self) -> SearchResult<()> {
        if self.chunk_size == 0 {
            return Err(SearchError::config_error("chunk_size must be at least 1"));
        }
        Ok(())
    }

    /// Writes the configuration as YAML that [`SearchConfig::load_from`] accepts
    pub fn save(&self, path: &Path) -> SearchResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|e| SearchError::from_io(path, e))
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(pattern) = cli.pattern {
            self.pattern = pattern;
        }
        if let Some(tolerance) = cli.tolerance {
            self.tolerance = tolerance;
        }
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if cli.file_extensions.is_some() {
            self.file_extensions = cli.file_extensions;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if let Some(size) = cli.chunk_size {
            self.chunk_size = size;
        }
        if let Some(overlap) = cli.overlap {
            self.overlap = overlap;
        }
        if let Some(strategy) = cli.approximate_strategy {
            self.approximate_strategy = strategy;
        }
        if cli.parallel_matchers {
            self.parallel_matchers = true;
        }
        if cli.stats_only {
            self.stats_only = true;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if let Some(mode) = cli.encoding_mode {
            self.encoding_mode = mode;
        }
        self
    }
}
