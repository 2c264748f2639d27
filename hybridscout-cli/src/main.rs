use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use hybridscout::{
    config::{CliOverrides, SearchConfig},
    edit_distance,
    search::search,
    validate_tolerance, ApproximateStrategy, ChunkOverlap, EncodingMode, MatchKind, SearchError,
    SearchOutput,
};
use std::io::{self, BufRead, Write};
use std::{num::NonZeroUsize, path::PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Failfast,
    Lossy,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// Pattern to search for (prompted for when omitted)
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// Maximum edit distance for approximate matches
    #[arg(short = 't', long, allow_negative_numbers = true)]
    tolerance: Option<i64>,

    /// File or directory to search
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// File extensions to include (e.g. txt,md)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Characters per chunk handed to the matchers
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Carry the last pattern-length minus one characters into the next chunk
    #[arg(long)]
    overlap: bool,

    /// Use the banded edit-distance computation
    #[arg(long)]
    banded: bool,

    /// Run the three matchers of each chunk concurrently
    #[arg(long)]
    parallel_matchers: bool,

    /// Show only statistics, not matches
    #[arg(short, long)]
    stats: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Number of threads to use
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// How to handle invalid UTF-8 sequences
    #[arg(long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to this file before searching
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search files for exact and approximate occurrences of a pattern
    Search(Box<CliSearchConfig>),

    /// Print the edit distance between two strings
    Distance {
        /// First string
        a: String,
        /// Second string
        b: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            let args = *args;
            let tolerance = args.tolerance.map(validate_tolerance).transpose()?;

            let file_config = SearchConfig::load_from(args.config.as_deref())?;
            let overrides = CliOverrides {
                pattern: args.pattern,
                tolerance,
                root_path: args.root,
                file_extensions: args.extensions.as_ref().map(|e| {
                    e.split(',')
                        .map(|s| s.trim().to_string())
                        .collect::<Vec<_>>()
                }),
                ignore_patterns: args.ignore,
                chunk_size: args.chunk_size,
                overlap: args.overlap.then_some(ChunkOverlap::CarryTail),
                approximate_strategy: args.banded.then_some(ApproximateStrategy::Banded),
                parallel_matchers: args.parallel_matchers,
                stats_only: args.stats,
                thread_count: args.threads,
                log_level: args.log_level,
                encoding_mode: args.encoding.map(|e| match e {
                    EncodingArg::Failfast => EncodingMode::FailFast,
                    EncodingArg::Lossy => EncodingMode::Lossy,
                }),
            };
            let mut config = file_config.merge_with_cli(overrides);

            init_tracing(&config.log_level);
            debug!("Effective configuration: {:?}", config);

            if config.pattern.is_empty() {
                prompt_for_input(&mut config, tolerance.is_none())?;
            }
            config.validate()?;
            if let Some(path) = &args.save_config {
                config.save(path)?;
                info!("Saved configuration to {}", path.display());
            }

            let result = search(&config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_search_results(&result, config.stats_only);
            }
            Ok(())
        }
        Commands::Distance { a, b } => {
            let a: Vec<char> = a.chars().collect();
            let b: Vec<char> = b.chars().collect();
            println!("{}", edit_distance(&a, &b));
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    // A subscriber may already be installed when embedded; that is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Asks for the pattern, and for the tolerance when none was given
fn prompt_for_input(config: &mut SearchConfig, ask_tolerance: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut ask = |prompt: &str| -> Result<String> {
        // Prompts go to stderr so --json output stays parseable
        eprint!("{}", prompt);
        io::stderr().flush()?;
        match lines.next() {
            Some(line) => Ok(line?.trim_end_matches(['\r', '\n']).to_string()),
            None => Err(SearchError::config_error("unexpected end of input")),
        }
    };

    config.pattern = ask("Enter the pattern to search for: ")?;
    if config.pattern.is_empty() {
        return Err(SearchError::config_error("no pattern given"));
    }

    if ask_tolerance {
        let raw = ask("Enter the tolerance for approximate matching: ")?;
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|e| SearchError::config_error(format!("invalid tolerance {:?}: {}", raw, e)))?;
        config.tolerance = validate_tolerance(value)?;
    }
    Ok(())
}

fn colored_kind(kind: MatchKind) -> colored::ColoredString {
    match kind {
        MatchKind::ExactKmp => kind.as_str().green(),
        MatchKind::ExactRollingHash => kind.as_str().cyan(),
        MatchKind::Approximate => kind.as_str().yellow(),
    }
}

fn print_search_results(result: &SearchOutput, stats_only: bool) {
    if !stats_only {
        for file_result in result.file_results.iter().filter(|f| f.has_matches()) {
            println!("\n{}", file_result.path.display().to_string().blue());
            for chunk in &file_result.chunks {
                println!("  chunk {} (offset {})", chunk.index, chunk.offset);
                for m in chunk.absolute_matches() {
                    println!("    {}: {}", m.position.to_string().green(), colored_kind(m.kind));
                }
            }
        }
        println!();
    }

    for kind in MatchKind::ALL {
        println!("{}: {}", colored_kind(kind), result.kind_counts.get(kind));
    }
    println!(
        "Found {} matches in {} files",
        result.total_matches, result.files_with_matches
    );
}
