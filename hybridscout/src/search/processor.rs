use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, trace, warn};

use super::chunks::TextChunks;
use super::matcher::HybridMatcher;
use crate::config::{ChunkOverlap, EncodingMode, SearchConfig, DEFAULT_CHUNK_SIZE};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::{ChunkResult, FileResult};

// Constants for file processing
const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Helper function to decode bytes into a String according to encoding mode
fn decode_bytes(bytes: &[u8], path: &Path, encoding_mode: EncodingMode) -> SearchResult<String> {
    match encoding_mode {
        EncodingMode::FailFast => {
            String::from_utf8(bytes.to_vec()).map_err(|e| SearchError::encoding_error(path, e))
        }
        EncodingMode::Lossy => {
            let cow = String::from_utf8_lossy(bytes);
            // If it's Owned, at least one invalid sequence was replaced.
            if let std::borrow::Cow::Owned(_) = cow {
                warn!("Invalid UTF-8 replaced in file: {}", path.display());
            }
            Ok(cow.into_owned())
        }
    }
}

/// Reads files, cuts them into chunks and runs the hybrid matcher on each
#[derive(Debug)]
pub struct FileProcessor {
    matcher: HybridMatcher,
    pattern: Vec<char>,
    chunk_size: usize,
    overlap: ChunkOverlap,
    encoding_mode: EncodingMode,
    metrics: SearchMetrics,
}

impl FileProcessor {
    /// Creates a processor for `pattern` with default chunking
    pub fn new(pattern: &str, matcher: HybridMatcher) -> Self {
        Self {
            matcher,
            pattern: pattern.chars().collect(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: ChunkOverlap::None,
            encoding_mode: EncodingMode::FailFast,
            metrics: SearchMetrics::new(),
        }
    }

    /// Creates a processor with every setting taken from `config`
    pub fn from_config(config: &SearchConfig) -> Self {
        let matcher = HybridMatcher::new(config.tolerance)
            .with_strategy(config.approximate_strategy)
            .with_parallel(config.parallel_matchers);
        Self::new(&config.pattern, matcher)
            .with_chunking(config.chunk_size, config.overlap)
            .with_encoding(config.encoding_mode)
    }

    pub fn with_chunking(mut self, chunk_size: usize, overlap: ChunkOverlap) -> Self {
        self.chunk_size = chunk_size.max(1);
        self.overlap = overlap;
        self
    }

    pub fn with_encoding(mut self, encoding_mode: EncodingMode) -> Self {
        self.encoding_mode = encoding_mode;
        self
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Searches an in-memory text chunk by chunk.
    ///
    /// Only chunks with at least one match are returned. Match positions are
    /// relative to their chunk's `offset`.
    pub fn process_text(&self, text: &str) -> Vec<ChunkResult> {
        let symbols: Vec<char> = text.chars().collect();
        let chunks = TextChunks::new(&symbols, self.chunk_size)
            .with_overlap(self.overlap, self.pattern.len());

        let results: Vec<ChunkResult> = chunks
            .filter_map(|chunk| {
                let scan = self.matcher.scan(chunk.text, &self.pattern);
                self.metrics.record_chunk(&scan.matches, scan.hash_collisions);
                let matches = scan.matches;
                (!matches.is_empty()).then(|| ChunkResult {
                    index: chunk.index,
                    offset: chunk.offset,
                    matches,
                })
            })
            .collect();

        trace!(
            "Searched {} characters for a {}-character pattern, {} chunks matched",
            symbols.len(),
            self.pattern.len(),
            results.len()
        );
        results
    }

    fn read_small_file(&self, path: &Path) -> SearchResult<String> {
        let bytes = std::fs::read(path).map_err(|e| SearchError::from_io(path, e))?;
        decode_bytes(&bytes, path, self.encoding_mode)
    }

    fn read_file_buffered(&self, path: &Path) -> SearchResult<String> {
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(SearchError::IoError)?;
        decode_bytes(&bytes, path, self.encoding_mode)
    }

    fn read_mmap_file(&self, path: &Path) -> SearchResult<String> {
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
        // The mapping only lives until the contents are decoded into an owned String
        let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
        decode_bytes(&mmap, path, self.encoding_mode)
    }

    fn read_file(&self, path: &Path) -> SearchResult<String> {
        match path.metadata() {
            Ok(metadata) => {
                let size = metadata.len();
                self.metrics.record_file_processing(size);

                if size < SMALL_FILE_THRESHOLD {
                    self.read_small_file(path)
                } else if size >= LARGE_FILE_THRESHOLD {
                    self.read_mmap_file(path)
                } else {
                    self.read_file_buffered(path)
                }
            }
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", path.display(), e);
                self.read_file_buffered(path)
            }
        }
    }

    /// Processes a file and returns any matches found
    pub fn process_file(&self, path: &Path) -> SearchResult<FileResult> {
        trace!("Processing file: {}", path.display());

        let contents = self.read_file(path)?;
        let chunks = self.process_text(&contents);
        if !chunks.is_empty() {
            debug!("{}: matches in {} chunks", path.display(), chunks.len());
        }

        Ok(FileResult {
            path: path.to_path_buf(),
            chunks,
        })
    }
}
