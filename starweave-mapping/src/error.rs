//! Mapping parser and planner error types

use thiserror::Error;

/// Errors raised while parsing a mapping document
///
/// All of these are fatal and occur before any source I/O.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is not a YAML mapping
    #[error("mapping document root must be a YAML mapping")]
    NotAMapping,

    /// Unknown top-level key
    #[error("unknown top-level key: {0}")]
    UnknownKey(String),

    /// A triples map has no subject specification
    #[error("triples map '{0}' has no subject")]
    MissingSubject(String),

    /// Malformed template syntax
    #[error("invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    /// Malformed join function on a quoted subject
    #[error("triples map '{map}' has an invalid join function: {function}")]
    InvalidJoin { map: String, function: String },

    /// A mapping references an undeclared named source
    #[error("triples map '{map}' references unknown source '{name}'")]
    UnknownSourceRef { map: String, name: String },

    /// A key holds a value of an unexpected shape
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while building the execution plan
///
/// Raised before any record is processed; Pass 2 never discovers a missing
/// dependency at run time.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A join references a triples map that does not exist
    #[error("triples map '{map}' joins against unknown map '{referenced}'")]
    UnknownMap { map: String, referenced: String },

    /// A join references another annotation map
    #[error("triples map '{map}' joins against annotation map '{referenced}'")]
    AnnotationReference { map: String, referenced: String },

    /// The join dependency graph contains a cycle
    #[error("cyclic join dependencies between maps: {}", involved.join(", "))]
    Cycle { involved: Vec<String> },

    /// A declared feature is not supported by the generator
    #[error("triples map '{map}' uses unsupported feature: {feature}")]
    Unsupported { map: String, feature: String },
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, ParseError>;
