//! Result types produced by the matchers and collected by the search engine.
//!
//! A [`Match`] is the smallest unit: a start offset inside one unit of text
//! plus the [`MatchKind`] of the matcher that reported it. Matches for one
//! unit are gathered into a [`MatchSet`], which both deduplicates and orders
//! them. The remaining types describe where a unit came from (a chunk of a
//! file) and roll the per-file results up into totals.
//!
//! Ordering is fixed by declaration order: matches sort by position first,
//! then by kind, with `ExactKmp < ExactRollingHash < Approximate`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Which matcher reported a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Prefix-function linear scan
    ExactKmp,
    /// Rabin-Karp rolling hash scan
    ExactRollingHash,
    /// Edit-distance window within tolerance
    Approximate,
}

impl MatchKind {
    pub const ALL: [MatchKind; 3] = [
        MatchKind::ExactKmp,
        MatchKind::ExactRollingHash,
        MatchKind::Approximate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::ExactKmp => "exact-kmp",
            MatchKind::ExactRollingHash => "exact-rolling-hash",
            MatchKind::Approximate => "approximate",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tagged hit. Field order matters: the derived `Ord` compares
/// `position` before `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Match {
    /// Start offset of the match within the unit of text it was found in
    pub position: usize,
    pub kind: MatchKind,
}

impl Match {
    pub fn new(position: usize, kind: MatchKind) -> Self {
        Self { position, kind }
    }
}

/// Deduplicating, ordered collection of matches for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    inner: BTreeSet<Match>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a hit; returns false if the same `(position, kind)` was already present
    pub fn insert(&mut self, m: Match) -> bool {
        self.inner.insert(m)
    }

    /// Tags every position with `kind` and inserts it
    pub fn extend_tagged<I>(&mut self, positions: I, kind: MatchKind)
    where
        I: IntoIterator<Item = usize>,
    {
        self.inner
            .extend(positions.into_iter().map(|p| Match::new(p, kind)));
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.inner.iter()
    }

    /// Consumes the set, yielding matches sorted by `(position, kind)`
    pub fn into_sorted_vec(self) -> Vec<Match> {
        self.inner.into_iter().collect()
    }
}

impl FromIterator<Match> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Match>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Matches found in one chunk of a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkResult {
    /// Zero-based index of the chunk within its file
    pub index: usize,
    /// Offset of the chunk's first character within the file
    pub offset: usize,
    /// Matches with positions relative to `offset`
    pub matches: Vec<Match>,
}

impl ChunkResult {
    /// Iterates the matches with positions translated to file offsets
    pub fn absolute_matches(&self) -> impl Iterator<Item = Match> + '_ {
        self.matches
            .iter()
            .map(move |m| Match::new(self.offset + m.position, m.kind))
    }
}

/// Represents all matches found in a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// The path to the file
    pub path: PathBuf,
    /// Chunks that produced at least one match
    pub chunks: Vec<ChunkResult>,
}

impl FileResult {
    pub fn match_count(&self) -> usize {
        self.chunks.iter().map(|c| c.matches.len()).sum()
    }

    pub fn has_matches(&self) -> bool {
        self.chunks.iter().any(|c| !c.matches.is_empty())
    }
}

/// Number of hits reported by each matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub exact_kmp: usize,
    pub exact_rolling_hash: usize,
    pub approximate: usize,
}

impl KindCounts {
    pub fn record(&mut self, kind: MatchKind) {
        match kind {
            MatchKind::ExactKmp => self.exact_kmp += 1,
            MatchKind::ExactRollingHash => self.exact_rolling_hash += 1,
            MatchKind::Approximate => self.approximate += 1,
        }
    }

    pub fn get(&self, kind: MatchKind) -> usize {
        match kind {
            MatchKind::ExactKmp => self.exact_kmp,
            MatchKind::ExactRollingHash => self.exact_rolling_hash,
            MatchKind::Approximate => self.approximate,
        }
    }
}

/// Represents the complete search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Results per file
    pub file_results: Vec<FileResult>,
    /// Total number of matches found
    pub total_matches: usize,
    /// Total number of files searched
    pub files_searched: usize,
    /// Total number of files with matches
    pub files_with_matches: usize,
    /// Breakdown of `total_matches` by matcher
    pub kind_counts: KindCounts,
}

impl SearchResult {
    /// Creates a new empty search result
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a file result to the search results
    pub fn add_file_result(&mut self, file_result: FileResult) {
        self.files_searched += 1;
        if file_result.has_matches() {
            self.total_matches += file_result.match_count();
            self.files_with_matches += 1;
            for chunk in &file_result.chunks {
                for m in &chunk.matches {
                    self.kind_counts.record(m.kind);
                }
            }
        }
        self.file_results.push(file_result);
    }
}
