use libc::{EACCES, ELOOP, ENOENT, ENOTDIR, EPERM};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Convenience alias for fallible search operations.
pub type Result<T> = core::result::Result<T, Error>;

/**
The error returned by [`search`](crate::search) and [`Finder`](crate::Finder) construction.

Both kinds are raised synchronously, before a single directory is read.
Everything that goes wrong *during* traversal is absorbed and, optionally,
recorded as a [`TraversalError`].
*/
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A numeric bound was out of range.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The name pattern or an exclude glob failed to compile.
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl Error {
    /// Returns true for invalid argument values (bindings usually map these to an argument error)
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true for pattern compilation failures
    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }
}

/// An invalid value in a [`SearchRequest`](crate::SearchRequest).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A depth, size or duration bound was negative.
    #[error("{field} must be a non-negative integer, got {value}")]
    Negative {
        /// Name of the offending request field, e.g. `max_depth`
        field: &'static str,
        /// The rejected value
        value: i64,
    },
    /// The worker pool was asked for zero threads.
    #[error("threads must be at least 1, got 0")]
    ZeroThreads,
}

impl ConfigurationError {
    /// The request field that was rejected.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match *self {
            Self::Negative { field, .. } => field,
            Self::ZeroThreads => "threads",
        }
    }
}

/// A pattern that could not be compiled.
///
/// Every message starts with `Search failed: ` so hosts can surface it verbatim.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The regular expression (or the regex a glob expanded to) was rejected.
    #[error("Search failed: invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),
    /// The name pattern was not valid glob syntax.
    #[error("Search failed: invalid glob pattern: {0}")]
    InvalidGlob(#[source] globset::Error),
    /// One of the exclude globs was not valid glob syntax.
    #[error("Search failed: invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        /// The exclude string as supplied
        pattern: String,
        /// The underlying glob error
        #[source]
        source: globset::Error,
    },
}

/**
A per-entry failure met while walking.

These never stop a search. The OS error code is mapped onto a handful of
variants so callers can tell "no permission" from "it vanished".
*/
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirEntryError {
    /// Permission was denied reading or stat-ing the entry.
    #[error("access denied: {0}")]
    AccessDenied(#[source] io::Error),
    /// The entry disappeared, or a symlink points nowhere.
    #[error("no such file or directory")]
    NotFound,
    /// A root or directory candidate was not a directory.
    #[error("not a directory")]
    NotADirectory,
    /// Symlink resolution looped in the kernel.
    #[error("too many levels of symbolic links")]
    TooManySymbolicLinks,
    /// Any other OS-level failure.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for DirEntryError {
    fn from(error: io::Error) -> Self {
        match error.raw_os_error() {
            Some(EACCES | EPERM) => Self::AccessDenied(error),
            Some(ENOENT) => Self::NotFound,
            Some(ENOTDIR) => Self::NotADirectory,
            Some(ELOOP) => Self::TooManySymbolicLinks,
            _ if error.kind() == io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(error),
        }
    }
}

/// A [`DirEntryError`] together with the path it happened at.
#[derive(Debug, Error)]
#[error("{}: {error}", .path.display())]
pub struct TraversalError {
    /// The directory or entry that could not be processed
    pub path: PathBuf,
    /// What went wrong
    #[source]
    pub error: DirEntryError,
}

impl TraversalError {
    pub(crate) fn new<P: Into<PathBuf>, E: Into<DirEntryError>>(path: P, error: E) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_bound_names_the_field() {
        let err = Error::from(ConfigurationError::Negative {
            field: "max_depth",
            value: -1,
        });
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "max_depth must be a non-negative integer, got -1"
        );
    }

    #[test]
    fn pattern_errors_carry_search_failed_prefix() {
        let source = ["(", "unclosed"].concat();
        let regex_err = regex::Regex::new(&source).unwrap_err();
        let err = Error::from(SearchError::from(regex_err));
        assert!(err.is_search());
        assert!(err.to_string().starts_with("Search failed"));
    }

    #[test]
    fn errno_classification() {
        let denied = DirEntryError::from(io::Error::from_raw_os_error(EACCES));
        assert!(matches!(denied, DirEntryError::AccessDenied(_)));

        let missing = DirEntryError::from(io::Error::from_raw_os_error(ENOENT));
        assert!(matches!(missing, DirEntryError::NotFound));

        let looped = DirEntryError::from(io::Error::from_raw_os_error(ELOOP));
        assert!(matches!(looped, DirEntryError::TooManySymbolicLinks));
    }
}
