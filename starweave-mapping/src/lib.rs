//! YARRRML-star mapping support for starweave
//!
//! This crate parses the YAML-based YARRRML-star mapping dialect into an
//! immutable rule model and computes a dependency-ordered execution plan
//! over it. It implements the dialect subset needed to express base triples
//! maps plus quoted (annotation) maps that join against them.
//!
//! # Key Features
//!
//! - **Parse once, execute many times**: the parser produces a compiled
//!   [`MappingModel`]; templates are tokenized a single time and reused per
//!   record.
//! - **Quoted triples maps**: a subject written as a
//!   `join(quoted=…, equal(str1=…, str2=…))` function marks the map as an
//!   annotation map, with an optional declared `filter:` block narrowing
//!   which matched triples it annotates.
//! - **Plan-time validation**: unresolved join references, joins against
//!   other annotation maps, and cycles fail before any source I/O.
//!
//! # Usage
//!
//! Parse a document with [`parse_str`], then build an [`ExecutionPlan`] to
//! obtain the order in which the engine must process the maps.

pub mod error;
pub mod model;
pub mod parser;
pub mod plan;
pub mod prefixes;
pub mod template;

pub use error::{MappingResult, ParseError, PlanError};
pub use model::{
    Author, JoinCondition, JoinFilter, MappingModel, ObjectSpec, PredicateObjectSpec, SourceKind,
    SourceRef, SubjectSpec, TargetSpec, TriplesMap,
};
pub use parser::parse_str;
pub use plan::ExecutionPlan;
pub use prefixes::PrefixMap;
pub use template::{sanitize_component, Instantiated, Template, TemplateToken, ValueStyle, MISSING_SENTINEL};
