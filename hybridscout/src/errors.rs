//! Error types for hybridscout.
//!
//! The matching core never fails: empty patterns, patterns longer than the
//! text and hash collisions are all handled as ordinary inputs. Everything in
//! this module belongs to the layers around the core, which read files,
//! load configuration and validate what the caller typed.
//!
//! ```rust,ignore
//! match search(&config) {
//!     Ok(output) => // Present output,
//!     Err(SearchError::FileNotFound(path)) => // Handle missing file,
//!     Err(SearchError::InvalidTolerance(t)) => // Reject input,
//!     Err(e) => // Handle other errors
//! }
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid tolerance: {0} (must be a non-negative integer)")]
    InvalidTolerance(i64),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

/// Checks a caller-supplied tolerance before it reaches the matchers.
///
/// The matchers take `usize`, so this is the only place a negative value can
/// be observed.
pub fn validate_tolerance(tolerance: i64) -> SearchResult<usize> {
    usize::try_from(tolerance).map_err(|_| SearchError::InvalidTolerance(tolerance))
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        let path = path.into();
        let unified = unify_path(&path);
        Self::EncodingError {
            path: unified,
            source,
        }
    }

    /// Maps an IO error raised while opening `path` onto the matching variant
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let path = Path::new("test.txt");
        let err = SearchError::file_not_found(path);
        assert!(matches!(err, SearchError::FileNotFound(_)));

        let err = SearchError::permission_denied(path);
        assert!(matches!(err, SearchError::PermissionDenied(_)));

        let err = SearchError::config_error("chunk_size must be at least 1");
        assert!(matches!(err, SearchError::ConfigError(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::InvalidTolerance(-3);
        assert_eq!(
            err.to_string(),
            "Invalid tolerance: -3 (must be a non-negative integer)"
        );

        let err = SearchError::config_error("Missing required field".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field"
        );

        let err = SearchError::file_not_found("test.txt");
        assert_eq!(err.to_string(), "File not found: test.txt");
    }

    #[test]
    fn test_validate_tolerance() {
        assert_eq!(validate_tolerance(0).unwrap(), 0);
        assert_eq!(validate_tolerance(7).unwrap(), 7);
        assert!(matches!(
            validate_tolerance(-1),
            Err(SearchError::InvalidTolerance(-1))
        ));
    }

    #[test]
    fn test_from_io_maps_kinds() {
        let path = Path::new("missing.txt");
        let err = SearchError::from_io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, SearchError::FileNotFound(_)));

        let err = SearchError::from_io(
            path,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, SearchError::PermissionDenied(_)));

        let err = SearchError::from_io(path, std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert!(matches!(err, SearchError::IoError(_)));
    }
}
