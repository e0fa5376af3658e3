//! Serialization error types

use thiserror::Error;

/// Errors from serializing or re-parsing quad streams
#[derive(Debug, Error)]
pub enum FormatError {
    /// I/O failure while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A quad cannot be expressed in the chosen format
    #[error("cannot serialize quad: {0}")]
    Unserializable(String),

    /// N-Quads parse failure (round-trip reader)
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type for serialization operations
pub type FormatResult<T> = Result<T, FormatError>;
