//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// File or directory does not exist
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Path contains invalid characters or escapes its root
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A file or entry name does not follow the archive naming grammar
    #[display("invalid archive name: {_0}")]
    InvalidName(#[error(not(source))] String),
    /// The container exists but is not a readable zip archive
    #[display("invalid container: {}", _0.display())]
    InvalidContainer(#[error(not(source))] PathBuf),
    /// The container does not hold the requested entry
    #[display("entry {entry} not found in {}", container.display())]
    EntryNotFound { container: PathBuf, entry: String },
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns `true` if the error means the requested container or entry is
    /// absent (as opposed to unreadable).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::EntryNotFound { .. })
    }

    pub(crate) fn from_io(err: IoError, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.into()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.into()),
            _ => Self::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind as IoKind;

    #[test]
    fn io_errors_are_mapped_by_kind() {
        let path = PathBuf::from("/archive/2/2025/vol/2_20251016.pvol.zip");
        let kind = ErrorKind::from_io(IoError::new(IoKind::NotFound, "gone"), &path);
        assert!(matches!(kind, ErrorKind::NotFound(ref p) if *p == path));
        assert!(kind.is_missing());

        let kind = ErrorKind::from_io(IoError::new(IoKind::PermissionDenied, "nope"), &path);
        assert!(matches!(kind, ErrorKind::PermissionDenied(_)));
        assert!(!kind.is_retryable());

        let kind = ErrorKind::from_io(IoError::new(IoKind::Interrupted, "again"), &path);
        assert!(kind.is_retryable());
    }

    #[test]
    fn entry_not_found_display() {
        let kind = ErrorKind::EntryNotFound {
            container: PathBuf::from("2_20251016.pvol.zip"),
            entry: "2_20251016_000000.pvol.h5".to_string(),
        };
        assert_eq!(
            kind.to_string(),
            "entry 2_20251016_000000.pvol.h5 not found in 2_20251016.pvol.zip"
        );
    }
}
