//! Error types for the hadith-graph pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A required reference table or matrix file is absent.
    ///
    /// Fatal for the collection being processed; the run must not
    /// continue and silently produce an empty graph.
    #[error("missing resource: {path}")]
    MissingResource {
        /// Path that was looked up
        path: PathBuf,
    },

    /// A token-tag sequence could not be resolved into spans
    #[error("malformed tag sequence: {0}")]
    TagSequence(String),

    /// A similarity matrix is not square or disagrees with its peer
    #[error("invalid similarity matrix: {0}")]
    InvalidMatrix(String),

    /// Validation errors
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing-resource error
    pub fn missing_resource(path: impl Into<PathBuf>) -> Self {
        Self::MissingResource { path: path.into() }
    }

    /// Create a tag-sequence error
    pub fn tag_sequence(msg: impl Into<String>) -> Self {
        Self::TagSequence(msg.into())
    }

    /// Create an invalid-matrix error
    pub fn invalid_matrix(msg: impl Into<String>) -> Self {
        Self::InvalidMatrix(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Check whether this error aborts the whole collection run.
    ///
    /// Per-document conditions (tag sequences) are recoverable; missing
    /// inputs are not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TagSequence(_))
    }
}
