//! Two-pass RDF-star generation engine for starweave
//!
//! This crate turns tabular records into RDF-star quads under a parsed
//! mapping model:
//!
//! 1. **Pass 1** iterates the non-annotation triples maps in plan order,
//!    emits their base quads, and writes every triple into a join-indexed
//!    cached-triple registry.
//! 2. **Pass 2** iterates the annotation maps, probes the registry through
//!    a per-map hash index, and synthesizes one fresh reifier per surviving
//!    match: a `rdf:reifies` link to the matched triple plus the map's
//!    annotation quads evaluated against the annotation record.
//!
//! The plan's topological order guarantees every annotation map runs only
//! after the maps it references have fully completed. Output ordering is
//! deterministic (plan order, record order, pair document order), so
//! identical inputs serialize byte-identically.
//!
//! Recoverable conditions — missing columns, unresolvable terms,
//! unresolved prefixes — substitute sentinels or skip single quads and are
//! tallied in the [`RunReport`]; fatal errors abort with [`EtlError`].

mod cache;
mod engine;
mod error;
mod generate;
mod reify;
mod report;
mod terms;

pub use cache::{CachedTriple, JoinIndex, TripleCache};
pub use engine::{Engine, EtlConfig};
pub use error::{EtlError, EtlResult};
pub use report::RunReport;
