use super::matcher::ExactMatcher;
use super::prefix::PrefixTable;
use super::Symbol;
use crate::results::MatchKind;

/// Linear-scan exact matcher driven by the pattern's prefix table.
///
/// Runs in O(n + m) and reports overlapping occurrences.
#[derive(Debug, Clone, Copy, Default)]
pub struct KmpMatcher;

impl ExactMatcher for KmpMatcher {
    fn kind(&self) -> MatchKind {
        MatchKind::ExactKmp
    }

    fn find_all<S: Symbol>(&self, text: &[S], pattern: &[S]) -> Vec<usize> {
        let m = pattern.len();
        if m == 0 || m > text.len() {
            return Vec::new();
        }

        let table = PrefixTable::build(pattern);
        let mut positions = Vec::new();
        let mut j = 0;

        for (i, &symbol) in text.iter().enumerate() {
            while j > 0 && symbol != pattern[j] {
                j = table.fallback(j);
            }
            if symbol == pattern[j] {
                j += 1;
            }
            if j == m {
                positions.push(i + 1 - m);
                j = table.fallback(j);
            }
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str, pattern: &str) -> Vec<usize> {
        KmpMatcher.find_all(text.as_bytes(), pattern.as_bytes())
    }

    #[test]
    fn test_basic_matches() {
        assert_eq!(find("ababcababc", "abc"), vec![2, 7]);
        assert_eq!(find("hello world", "world"), vec![6]);
        assert_eq!(find("hello world", "xyz"), Vec::<usize>::new());
    }

    #[test]
    fn test_overlapping_matches() {
        assert_eq!(find("aaaaa", "aa"), vec![0, 1, 2, 3]);
        assert_eq!(find("abababa", "aba"), vec![0, 2, 4]);
    }

    #[test]
    fn test_whole_text_match() {
        assert_eq!(find("abc", "abc"), vec![0]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(find("", "abc").is_empty());
        assert!(find("abc", "abcdef").is_empty());
        assert!(find("abc", "").is_empty());
    }

    #[test]
    fn test_char_positions_are_symbol_offsets() {
        let text: Vec<char> = "día de días".chars().collect();
        let pattern: Vec<char> = "día".chars().collect();
        assert_eq!(KmpMatcher.find_all(&text, &pattern), vec![0, 7]);
    }
}
