//! Edit-distance window matcher.
//!
//! Every length-`m` window of the text is compared against the pattern with
//! the Levenshtein distance (insert, delete and substitute all cost 1). The
//! full dynamic-programming table makes this O(n·m²), which dominates the
//! cost of a hybrid search. [`bounded_edit_distance`] restricts the table to
//! the diagonal band that can still finish within the tolerance and is
//! available through [`ApproximateStrategy::Banded`].
use serde::{Deserialize, Serialize};

use super::Symbol;

/// How window distances are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApproximateStrategy {
    /// Complete (m+1)×(m+1) table per window
    #[default]
    Full,
    /// Band of width 2·tolerance+1 around the diagonal, early exit past the tolerance
    Banded,
}

/// Levenshtein distance between `a` and `b`.
///
/// `dp[i][j]` is the distance between the first `i` symbols of `a` and the
/// first `j` symbols of `b`.
pub fn edit_distance<S: Symbol>(a: &[S], b: &[S]) -> usize {
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1])
            };
        }
    }

    dp[a.len()][b.len()]
}

/// Levenshtein distance if it is at most `limit`, `None` otherwise.
///
/// Cells further than `limit` from the diagonal can never lead to a result
/// within `limit`, so only the band `|i - j| <= limit` is filled and each row
/// costs O(limit). Two rows are kept; the cell on either side of the band
/// reads as `limit + 1`.
pub fn bounded_edit_distance<S: Symbol>(a: &[S], b: &[S], limit: usize) -> Option<usize> {
    if a.len().abs_diff(b.len()) > limit {
        return None;
    }
    // No distance exceeds the longer input
    let limit = limit.min(a.len().max(b.len()));

    let over = limit + 1;
    let mut prev: Vec<usize> = (0..=b.len()).map(|j| j.min(over)).collect();
    let mut curr = vec![over; b.len() + 1];

    for i in 1..=a.len() {
        let lo = i.saturating_sub(limit).max(1);
        let hi = (i + limit).min(b.len());

        // Stale cells from two rows back sit just outside the band
        curr[0] = i.min(over);
        if lo > 1 {
            curr[lo - 1] = over;
        }
        if hi < b.len() {
            curr[hi + 1] = over;
        }
        let mut row_min = curr[0];

        for j in lo..=hi {
            let value = if a[i - 1] == b[j - 1] {
                prev[j - 1]
            } else {
                1 + prev[j].min(curr[j - 1]).min(prev[j - 1])
            };
            curr[j] = value.min(over);
            row_min = row_min.min(curr[j]);
        }

        if row_min > limit {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= limit).then_some(distance)
}

/// Reports every window whose distance from the pattern is within `tolerance`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMatcher {
    pub tolerance: usize,
    pub strategy: ApproximateStrategy,
}

impl ApproximateMatcher {
    pub fn new(tolerance: usize) -> Self {
        Self {
            tolerance,
            strategy: ApproximateStrategy::Full,
        }
    }

    pub fn with_strategy(mut self, strategy: ApproximateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Whether a single window is accepted
    pub fn accepts<S: Symbol>(&self, pattern: &[S], window: &[S]) -> bool {
        match self.strategy {
            ApproximateStrategy::Full => edit_distance(pattern, window) <= self.tolerance,
            ApproximateStrategy::Banded => {
                bounded_edit_distance(pattern, window, self.tolerance).is_some()
            }
        }
    }

    /// Window start offsets, ascending. No windows exist when the pattern is
    /// empty or longer than the text.
    pub fn find_all<S: Symbol>(&self, text: &[S], pattern: &[S]) -> Vec<usize> {
        let m = pattern.len();
        if m == 0 || m > text.len() {
            return Vec::new();
        }

        text.windows(m)
            .enumerate()
            .filter(|(_, window)| self.accepts(pattern, window))
            .map(|(start, _)| start)
            .collect()
    }
}
