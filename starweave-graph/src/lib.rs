//! RDF-star quad intermediate representation for starweave
//!
//! This crate provides the canonical types the mapping engine produces and
//! formatters consume, independent of any serialization format.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form.
//!    Compaction is handled by formatters at output time.
//!
//! 2. **Explicit datatypes** - Literals always carry a datatype. Plain
//!    strings use `xsd:string`, language-tagged strings use `rdf:langString`.
//!
//! 3. **Bag semantics by default** - `Dataset` uses `Vec<Quad>` to preserve
//!    the generator's deterministic emission order. Call `dedupe()`
//!    explicitly for set semantics.
//!
//! 4. **Quoted triples** - `Term::Quoted` embeds a triple as a term, the
//!    RDF-star construct reifiers point at.

mod dataset;
mod quad;
mod term;

pub use dataset::Dataset;
pub use quad::{Quad, Triple};
pub use term::{BlankId, Term};
