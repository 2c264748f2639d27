use super::approximate::{ApproximateMatcher, ApproximateStrategy};
use super::kmp::KmpMatcher;
use super::rolling_hash::RollingHashMatcher;
use super::Symbol;
use crate::results::{Match, MatchKind, MatchSet};

/// Common interface of the two exact matchers.
///
/// Both implementations compute the same set of positions by different
/// means; the hybrid matcher runs both and keeps both sets of tags.
pub trait ExactMatcher {
    /// Tag attached to every hit from this matcher
    fn kind(&self) -> MatchKind;

    /// All start offsets of `pattern` in `text`, ascending, overlaps included
    fn find_all<S: Symbol>(&self, text: &[S], pattern: &[S]) -> Vec<usize>;
}

/// Runs the prefix-function, rolling-hash and edit-distance matchers on the
/// same unit of text and merges their tagged hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridMatcher {
    kmp: KmpMatcher,
    rolling_hash: RollingHashMatcher,
    approximate: ApproximateMatcher,
    parallel: bool,
}

impl HybridMatcher {
    pub fn new(tolerance: usize) -> Self {
        Self {
            approximate: ApproximateMatcher::new(tolerance),
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: ApproximateStrategy) -> Self {
        self.approximate = self.approximate.with_strategy(strategy);
        self
    }

    /// Run the three matchers on the rayon pool instead of one after another
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Tagged hits sorted by position, then by kind
    pub fn search<S: Symbol>(&self, text: &[S], pattern: &[S]) -> Vec<Match> {
        self.scan(text, pattern).matches
    }

    /// Like [`HybridMatcher::search`], also reporting how many rolling-hash
    /// hits failed verification
    pub fn scan<S: Symbol>(&self, text: &[S], pattern: &[S]) -> HybridScan {
        let (kmp_hits, (hash_scan, approx_hits)) = if self.parallel {
            rayon::join(
                || self.kmp.find_all(text, pattern),
                || {
                    rayon::join(
                        || self.rolling_hash.scan(text, pattern),
                        || self.approximate.find_all(text, pattern),
                    )
                },
            )
        } else {
            (
                self.kmp.find_all(text, pattern),
                (
                    self.rolling_hash.scan(text, pattern),
                    self.approximate.find_all(text, pattern),
                ),
            )
        };

        let mut set = MatchSet::new();
        set.extend_tagged(kmp_hits, self.kmp.kind());
        set.extend_tagged(hash_scan.positions, self.rolling_hash.kind());
        set.extend_tagged(approx_hits, MatchKind::Approximate);
        HybridScan {
            matches: set.into_sorted_vec(),
            hash_collisions: hash_scan.collisions,
        }
    }
}

/// Output of [`HybridMatcher::scan`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HybridScan {
    pub matches: Vec<Match>,
    pub hash_collisions: usize,
}

/// Hybrid search over one unit of text with the default (full-table,
/// sequential) configuration.
///
/// An empty pattern yields no matches. A pattern longer than the text yields
/// no matches.
pub fn hybrid_search<S: Symbol>(text: &[S], pattern: &[S], tolerance: usize) -> Vec<Match> {
    HybridMatcher::new(tolerance).search(text, pattern)
}

/// [`hybrid_search`] over string slices; positions are character offsets
pub fn hybrid_search_str(text: &str, pattern: &str, tolerance: usize) -> Vec<Match> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    hybrid_search(&text, &pattern, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_positions(matches: &[Match], kind: MatchKind) -> Vec<usize> {
        matches
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.position)
            .collect()
    }

    #[test]
    fn test_worked_example_exact() {
        let matches = hybrid_search(b"ababcababc", b"abc", 0);
        assert_eq!(
            matches,
            vec![
                Match::new(2, MatchKind::ExactKmp),
                Match::new(2, MatchKind::ExactRollingHash),
                Match::new(2, MatchKind::Approximate),
                Match::new(7, MatchKind::ExactKmp),
                Match::new(7, MatchKind::ExactRollingHash),
                Match::new(7, MatchKind::Approximate),
            ]
        );
    }

    #[test]
    fn test_worked_example_approximate() {
        let matches = hybrid_search(b"aaaa", b"ab", 1);
        assert!(exact_positions(&matches, MatchKind::ExactKmp).is_empty());
        assert!(exact_positions(&matches, MatchKind::ExactRollingHash).is_empty());
        assert_eq!(
            exact_positions(&matches, MatchKind::Approximate),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_empty_text_and_long_pattern() {
        assert!(hybrid_search(b"", b"abc", 2).is_empty());
        assert!(hybrid_search(b"abc", b"abcdef", 5).is_empty());
    }

    #[test]
    fn test_empty_pattern_policy() {
        assert!(hybrid_search(b"anything", b"", 0).is_empty());
        assert!(hybrid_search(b"", b"", 3).is_empty());
    }

    #[test]
    fn test_exact_matchers_agree() {
        let texts = [
            "abracadabra",
            "aaaaaaaaaa",
            "mississippi",
            "the rain in spain stays mainly in the plain",
            "",
        ];
        let patterns = ["a", "abra", "aa", "issi", "ain", "in the", "zzz"];
        for text in texts {
            for pattern in patterns {
                assert_eq!(
                    KmpMatcher.find_all(text.as_bytes(), pattern.as_bytes()),
                    RollingHashMatcher.find_all(text.as_bytes(), pattern.as_bytes()),
                    "{:?} in {:?}",
                    pattern,
                    text
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let text = b"she sells sea shells by the sea shore";
        let first = hybrid_search(text, b"sea", 1);
        let second = hybrid_search(text, b"sea", 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_sorted_and_unique() {
        let matches = hybrid_search(b"abcabdabcab", b"abc", 1);
        for pair in matches.windows(2) {
            assert!(pair[0] < pair[1], "{:?} not before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = b"approximate apprximate aproximate approxiamte approximate";
        let pattern = b"approximate";
        let sequential = HybridMatcher::new(2).search(text, pattern);
        let parallel = HybridMatcher::new(2).with_parallel(true).search(text, pattern);
        let banded = HybridMatcher::new(2)
            .with_strategy(ApproximateStrategy::Banded)
            .search(text, pattern);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential, banded);
    }

    #[test]
    fn test_banded_with_unbounded_tolerance() {
        let full = HybridMatcher::new(usize::MAX).search(b"abcd", b"xy");
        let banded = HybridMatcher::new(usize::MAX)
            .with_strategy(ApproximateStrategy::Banded)
            .search(b"abcd", b"xy");
        assert_eq!(exact_positions(&full, MatchKind::Approximate), vec![0, 1, 2]);
        assert_eq!(full, banded);
    }

    #[test]
    fn test_scan_reports_hash_collisions() {
        // 198 and b'a' share a residue modulo 101
        let text = [198u8, b'b', b'a', b'b'];
        let scan = HybridMatcher::new(0).scan(&text, b"ab");
        assert_eq!(scan.hash_collisions, 1);
        assert_eq!(exact_positions(&scan.matches, MatchKind::ExactRollingHash), vec![2]);
        assert_eq!(
            exact_positions(&scan.matches, MatchKind::ExactKmp),
            exact_positions(&scan.matches, MatchKind::ExactRollingHash)
        );

        let parallel = HybridMatcher::new(0).with_parallel(true).scan(&text, b"ab");
        assert_eq!(parallel, scan);
    }

    #[test]
    fn test_str_positions_are_char_offsets() {
        let matches = hybrid_search_str("añoaño", "año", 0);
        assert_eq!(exact_positions(&matches, MatchKind::ExactKmp), vec![0, 3]);
    }
}
