//! Error types for source loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading a tabular source
///
/// The engine collects these per source and reports them all before
/// aborting a run, rather than stopping at the first failure.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file does not exist
    #[error("source file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O failure while reading the source
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing failure
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON parsing or shape failure
    #[error("failed to parse JSON {path}: {message}")]
    Json { path: PathBuf, message: String },

    /// No loader is registered for the source kind
    #[error("no loader registered for source kind '{kind}'")]
    UnsupportedKind { kind: String },
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;
