//! Exact and approximate substring search.
//!
//! Three matchers work on one unit of text at a time:
//!
//! - [`kmp::KmpMatcher`] scans once, falling back through the pattern's
//!   [`prefix::PrefixTable`] on a mismatch.
//! - [`rolling_hash::RollingHashMatcher`] slides a Rabin-Karp hash over the
//!   text and verifies every hash hit.
//! - [`approximate::ApproximateMatcher`] accepts every pattern-length window
//!   whose Levenshtein distance from the pattern is within a tolerance.
//!
//! [`matcher::HybridMatcher`] runs all three and merges their tagged hits.
//! The two exact matchers are expected to agree; both are kept so each can
//! check the other.
//!
//! Around the matchers, [`chunks::TextChunks`] cuts a file into units,
//! [`processor::FileProcessor`] reads and decodes files and
//! [`engine::search`] walks a directory tree in parallel with rayon.
//!
//! Chunks are searched independently. Unless
//! [`ChunkOverlap::CarryTail`](crate::config::ChunkOverlap::CarryTail) is
//! configured, an occurrence that crosses a chunk boundary is not reported.
pub mod approximate;
pub mod chunks;
pub mod engine;
pub mod kmp;
pub mod matcher;
pub mod prefix;
pub mod processor;
pub mod rolling_hash;

pub use approximate::{bounded_edit_distance, edit_distance, ApproximateMatcher, ApproximateStrategy};
pub use engine::search;
pub use kmp::KmpMatcher;
pub use matcher::{hybrid_search, hybrid_search_str, ExactMatcher, HybridMatcher, HybridScan};
pub use prefix::PrefixTable;
pub use processor::FileProcessor;
pub use rolling_hash::RollingHashMatcher;

/// An element of a pattern or text.
///
/// `code` feeds the rolling hash; equal symbols must have equal codes.
pub trait Symbol: Copy + Eq + Send + Sync {
    fn code(self) -> u64;
}

impl Symbol for u8 {
    #[inline]
    fn code(self) -> u64 {
        u64::from(self)
    }
}

impl Symbol for char {
    #[inline]
    fn code(self) -> u64 {
        u64::from(u32::from(self))
    }
}
