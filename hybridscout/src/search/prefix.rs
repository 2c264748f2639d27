use std::ops::Deref;

use super::Symbol;

/// Failure function of a pattern.
///
/// `table[i]` is the length of the longest proper prefix of `pattern[..=i]`
/// that is also a suffix of it. `table[0]` is always 0 and `table[i] <= i`.
/// An empty pattern produces an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable(Vec<usize>);

impl PrefixTable {
    pub fn build<S: Symbol>(pattern: &[S]) -> Self {
        let mut table = vec![0; pattern.len()];
        let mut j = 0;

        for i in 1..pattern.len() {
            while j > 0 && pattern[i] != pattern[j] {
                j = table[j - 1];
            }
            if pattern[i] == pattern[j] {
                j += 1;
            }
            table[i] = j;
        }

        Self(table)
    }

    /// Where to resume after the first `matched` pattern symbols matched
    /// and the next one did not
    #[inline]
    pub fn fallback(&self, matched: usize) -> usize {
        self.0[matched - 1]
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl Deref for PrefixTable {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}
