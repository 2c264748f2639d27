//! Decides which files a directory search hands to the matchers.
//!
//! The matchers work on decoded text, so anything that looks binary is
//! skipped up front, as are paths hit by an ignore glob and, when an
//! extension list is configured, files with other extensions.

use glob::Pattern;
use std::path::Path;
use tracing::warn;

/// Extensions that are never worth decoding as text
const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "obj", "o", "class", "jar", "war", "ear", "png", "jpg",
    "jpeg", "gif", "bmp", "ico", "pdf", "doc", "docx", "xls", "xlsx", "zip", "tar", "gz", "7z",
    "rar", "wasm", "rlib",
];

/// Compiled file filter
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    extensions: Option<Vec<String>>,
    ignore: Vec<Pattern>,
}

impl FileFilter {
    /// Compiles the ignore globs. Invalid globs are logged and dropped.
    pub fn new(extensions: Option<Vec<String>>, ignore_patterns: &[String]) -> Self {
        let ignore = ignore_patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid glob {:?}: {}", p, e);
                    None
                }
            })
            .collect();
        Self { extensions, ignore }
    }

    /// Checks the extension list; no list means every extension passes
    pub fn has_valid_extension(&self, path: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(exts) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext))),
        }
    }

    /// Checks the ignore globs and the always-ignored build directories
    pub fn should_ignore(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");

        if normalized.contains("/target/") || normalized.contains("/.git/") {
            return true;
        }

        self.ignore.iter().any(|p| p.matches(&normalized))
    }

    /// Determines if a file should be searched
    pub fn includes(&self, path: &Path) -> bool {
        !is_likely_binary(path) && self.has_valid_extension(path) && !self.should_ignore(path)
    }
}

/// Checks if a file is likely to be binary, going by its extension
pub fn is_likely_binary(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            BINARY_EXTENSIONS
                .iter()
                .any(|bin_ext| bin_ext.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(extensions: Option<&[&str]>, ignore: &[&str]) -> FileFilter {
        FileFilter::new(
            extensions.map(|e| e.iter().map(|s| s.to_string()).collect()),
            &ignore.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_has_valid_extension() {
        let f = filter(Some(&["txt"]), &[]);
        assert!(f.has_valid_extension(Path::new("notes.txt")));
        assert!(f.has_valid_extension(Path::new("NOTES.TXT"))); // Test case insensitivity
        assert!(!f.has_valid_extension(Path::new("notes.md")));
        assert!(!f.has_valid_extension(Path::new("notes"))); // No extension

        let any = filter(None, &[]);
        assert!(any.has_valid_extension(Path::new("notes")));
    }

    #[test]
    fn test_should_ignore() {
        let f = filter(
            None,
            &["**/chunk_[0-4].txt", "target/**/*.rs", ".git/*", "**/*.tmp"],
        );

        // Should ignore
        assert!(f.should_ignore(Path::new("chunk_0.txt")));
        assert!(f.should_ignore(Path::new("dir/chunk_2.txt")));
        assert!(f.should_ignore(Path::new("target/debug/main.rs")));
        assert!(f.should_ignore(Path::new(".git/config")));
        assert!(f.should_ignore(Path::new("src/temp.tmp")));
        assert!(f.should_ignore(Path::new("repo/.git/HEAD")));

        // Should not ignore
        assert!(!f.should_ignore(Path::new("chunk_5.txt")));
        assert!(!f.should_ignore(Path::new("src/main.rs")));
        assert!(!f.should_ignore(Path::new(".gitignore")));
    }

    #[test]
    fn test_invalid_glob_is_dropped() {
        let f = filter(None, &["[unclosed", "*.log"]);
        assert!(f.should_ignore(Path::new("run.log")));
        assert!(!f.should_ignore(Path::new("[unclosed")));
    }

    #[test]
    fn test_is_likely_binary() {
        assert!(is_likely_binary(Path::new("test.exe")));
        assert!(is_likely_binary(Path::new("test.PNG"))); // Test case insensitivity
        assert!(!is_likely_binary(Path::new("test.txt")));
        assert!(!is_likely_binary(Path::new("test")));
    }

    #[test]
    fn test_includes() {
        let f = filter(Some(&["txt", "exe"]), &["target/**"]);
        assert!(f.includes(Path::new("corpus/a.txt")));
        assert!(!f.includes(Path::new("corpus/a.md"))); // Wrong extension
        assert!(!f.includes(Path::new("target/out.txt"))); // Ignored
        assert!(!f.includes(Path::new("tool.exe"))); // Binary wins over extension list
    }
}
