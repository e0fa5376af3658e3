//! Mapping model structures
//!
//! The compiled, immutable representation of a YARRRML-star mapping
//! document. These structures are produced by the [`crate::parser`] module
//! and consumed by the execution planner and the generation engine.

mod document;
mod join;
mod object;
mod source;
mod triples_map;

pub use document::{Author, MappingModel, TargetSpec};
pub use join::{JoinCondition, JoinFilter};
pub use object::{ObjectSpec, PredicateObjectSpec};
pub use source::{SourceKind, SourceRef};
pub use triples_map::{SubjectSpec, TriplesMap};
