use tracing::trace;

use super::matcher::ExactMatcher;
use super::Symbol;
use crate::results::MatchKind;

/// Radix of the polynomial hash
pub const BASE: u64 = 256;
/// Modulus of the polynomial hash.
///
/// Deliberately small: collisions are common and are filtered out by the
/// symbol-by-symbol verification in [`RollingHashMatcher::scan`], never by a
/// wider modulus.
pub const PRIME: u64 = 101;

/// Outcome of one rolling-hash scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollingHashScan {
    /// Verified match positions, ascending
    pub positions: Vec<usize>,
    /// Windows whose hash matched the pattern's but whose symbols did not
    pub collisions: usize,
}

/// Rabin-Karp exact matcher over a window of `m` symbols
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingHashMatcher;

/// Polynomial hash of `symbols` modulo [`PRIME`]
pub fn hash_of<S: Symbol>(symbols: &[S]) -> u64 {
    symbols
        .iter()
        .fold(0, |h, s| (BASE * h + s.code() % PRIME) % PRIME)
}

/// Slides the window one symbol to the right.
///
/// `high` is `BASE^(m-1) mod PRIME`.
#[inline]
pub fn roll(hash: u64, removed: u64, added: u64, high: u64) -> u64 {
    // Adding PRIME before subtracting keeps the value in [0, PRIME)
    let without_head = (hash + PRIME - (removed % PRIME) * high % PRIME) % PRIME;
    (BASE * without_head + added % PRIME) % PRIME
}

impl RollingHashMatcher {
    /// Scans `text`, returning verified positions and the collision count
    pub fn scan<S: Symbol>(&self, text: &[S], pattern: &[S]) -> RollingHashScan {
        let m = pattern.len();
        let n = text.len();
        let mut scan = RollingHashScan::default();
        if m == 0 || m > n {
            return scan;
        }

        let high = (1..m).fold(1, |h, _| h * BASE % PRIME);
        let pattern_hash = hash_of(pattern);
        let mut window_hash = hash_of(&text[..m]);

        for start in 0..=n - m {
            if window_hash == pattern_hash {
                if text[start..start + m] == *pattern {
                    scan.positions.push(start);
                } else {
                    trace!("Rolling hash collision at offset {}", start);
                    scan.collisions += 1;
                }
            }
            if start + m < n {
                window_hash = roll(
                    window_hash,
                    text[start].code(),
                    text[start + m].code(),
                    high,
                );
            }
        }

        scan
    }
}

impl ExactMatcher for RollingHashMatcher {
    fn kind(&self) -> MatchKind {
        MatchKind::ExactRollingHash
    }

    fn find_all<S: Symbol>(&self, text: &[S], pattern: &[S]) -> Vec<usize> {
        self.scan(text, pattern).positions
    }
}
