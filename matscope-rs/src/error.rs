//! Error types for MAT file loading.
//!
//! Loading can fail in exactly three ways, captured by [`Error`]. Whatever
//! backend was in use, "the file could not be parsed" always surfaces as
//! [`Error::ParseFailure`], with the backend's own error kept as its
//! [`ParseCause`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a MAT file.
#[derive(Error, Debug)]
pub enum Error {
    /// The path does not exist.
    #[error("File not found: {}", path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file needs a backend that was not compiled in.
    #[error(
        "'{}' is a v7.3 (HDF5-based) MAT file, but {capability} support is not available \
         (rebuild with the `{capability}` feature)",
        path.display()
    )]
    MissingCapability {
        /// Path of the file that needed the capability.
        path: PathBuf,
        /// Name of the missing capability.
        capability: &'static str,
    },

    /// The file exists but could not be parsed.
    #[error("Failed to parse MAT file '{}': {source}", path.display())]
    ParseFailure {
        /// Path of the file that failed to parse.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: ParseCause,
    },
}

/// The original failure behind an [`Error::ParseFailure`].
#[derive(Error, Debug)]
pub enum ParseCause {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The Level 5 backend rejected the file.
    #[error("{0}")]
    Legacy(String),

    /// The HDF5 library reported an error.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// The file content is not laid out as expected.
    #[error("{0}")]
    Malformed(String),
}

/// Coarse classification of an [`Error`], for callers that only branch on
/// the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::MissingCapability`].
    MissingCapability,
    /// See [`Error::ParseFailure`].
    ParseFailure,
}

impl Error {
    /// Create a NotFound error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a MissingCapability error.
    pub fn missing_capability(path: impl Into<PathBuf>, capability: &'static str) -> Self {
        Self::MissingCapability {
            path: path.into(),
            capability,
        }
    }

    /// Create a ParseFailure wrapping the given cause.
    pub fn parse_failure(path: impl Into<PathBuf>, source: impl Into<ParseCause>) -> Self {
        Self::ParseFailure {
            path: path.into(),
            source: source.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::MissingCapability { .. } => ErrorKind::MissingCapability,
            Error::ParseFailure { .. } => ErrorKind::ParseFailure,
        }
    }
}

impl ParseCause {
    /// Create a Malformed cause with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}
