//! Engine error types

use starweave_format::FormatError;
use starweave_mapping::{ParseError, PlanError};
use starweave_sources::SourceError;
use thiserror::Error;

/// Fatal errors from an ETL run
///
/// Recoverable conditions (template misses, per-quad skips, unresolved
/// prefixes) never surface here; they are tallied in the
/// [`crate::RunReport`] instead.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Mapping document failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Execution plan could not be built
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// One or more sources failed to load
    ///
    /// Every declared source is attempted before this is raised, so a
    /// single run reports all failures at once.
    #[error("{} source(s) failed to load", failures.len())]
    Sources {
        /// (source access, error) per failed source
        failures: Vec<(String, SourceError)>,
    },

    /// Serialization or sink failure
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type for engine operations
pub type EtlResult<T> = Result<T, EtlError>;
