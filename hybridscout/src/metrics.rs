use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::results::{Match, MatchKind};
use crate::search::processor::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Counters shared by every clone; safe to update from rayon workers
#[derive(Debug, Clone, Default)]
pub struct SearchMetrics {
    // File processing metrics
    small_files_processed: Arc<AtomicU64>,
    buffered_files_processed: Arc<AtomicU64>,
    mmap_files_processed: Arc<AtomicU64>,

    // Matching metrics
    chunks_scanned: Arc<AtomicU64>,
    kmp_hits: Arc<AtomicU64>,
    rolling_hash_hits: Arc<AtomicU64>,
    approximate_hits: Arc<AtomicU64>,
    hash_collisions: Arc<AtomicU64>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records which read strategy a file of `size` bytes goes through
    pub fn record_file_processing(&self, size: u64) {
        if size < SMALL_FILE_THRESHOLD {
            self.small_files_processed.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_files_processed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_files_processed
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records one searched chunk, the hits it produced and the rolling-hash
    /// hits that failed verification
    pub fn record_chunk(&self, matches: &[Match], hash_collisions: usize) {
        self.chunks_scanned.fetch_add(1, Ordering::Relaxed);
        self.hash_collisions
            .fetch_add(hash_collisions as u64, Ordering::Relaxed);
        for m in matches {
            let counter = match m.kind {
                MatchKind::ExactKmp => &self.kmp_hits,
                MatchKind::ExactRollingHash => &self.rolling_hash_hits,
                MatchKind::Approximate => &self.approximate_hits,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            small_files: self.small_files_processed.load(Ordering::Relaxed),
            buffered_files: self.buffered_files_processed.load(Ordering::Relaxed),
            mmap_files: self.mmap_files_processed.load(Ordering::Relaxed),
            chunks_scanned: self.chunks_scanned.load(Ordering::Relaxed),
            kmp_hits: self.kmp_hits.load(Ordering::Relaxed),
            rolling_hash_hits: self.rolling_hash_hits.load(Ordering::Relaxed),
            approximate_hits: self.approximate_hits.load(Ordering::Relaxed),
            hash_collisions: self.hash_collisions.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Files processed (small/buffered/mmap): {}/{}/{}\n\
             Chunks scanned: {}\n\
             Hits (exact-kmp/exact-rolling-hash/approximate): {}/{}/{}\n\
             Rolling-hash collisions: {}",
            stats.small_files,
            stats.buffered_files,
            stats.mmap_files,
            stats.chunks_scanned,
            stats.kmp_hits,
            stats.rolling_hash_hits,
            stats.approximate_hits,
            stats.hash_collisions
        );
        if stats.kmp_hits != stats.rolling_hash_hits {
            // Both exact matchers implement the same semantics
            warn!(
                "Exact matchers disagree: {} prefix-function hits vs {} rolling-hash hits",
                stats.kmp_hits,
                stats.rolling_hash_hits
            );
        }
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub small_files: u64,
    pub buffered_files: u64,
    pub mmap_files: u64,
    pub chunks_scanned: u64,
    pub kmp_hits: u64,
    pub rolling_hash_hits: u64,
    pub approximate_hits: u64,
    pub hash_collisions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_processing_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_file_processing(1000); // Small file
        metrics.record_file_processing(100000); // Buffered file
        metrics.record_file_processing(20_000_000); // Memory mapped file

        let stats = metrics.get_stats();
        assert_eq!(stats.small_files, 1);
        assert_eq!(stats.buffered_files, 1);
        assert_eq!(stats.mmap_files, 1);
    }

    #[test]
    fn test_chunk_tracking() {
        let metrics = SearchMetrics::new();
        let hits = [
            Match::new(0, MatchKind::ExactKmp),
            Match::new(0, MatchKind::ExactRollingHash),
            Match::new(0, MatchKind::Approximate),
            Match::new(4, MatchKind::Approximate),
        ];
        metrics.record_chunk(&hits, 2);
        metrics.record_chunk(&[], 1);

        let stats = metrics.get_stats();
        assert_eq!(stats.chunks_scanned, 2);
        assert_eq!(stats.kmp_hits, 1);
        assert_eq!(stats.rolling_hash_hits, 1);
        assert_eq!(stats.approximate_hits, 2);
        assert_eq!(stats.hash_collisions, 3);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = SearchMetrics::new();
        let clone = metrics.clone();
        clone.record_chunk(&[Match::new(1, MatchKind::ExactKmp)], 0);
        assert_eq!(metrics.get_stats().kmp_hits, 1);
    }
}
