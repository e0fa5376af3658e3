//! Tabular source loading for starweave
//!
//! This crate provides the record types the generation engine iterates,
//! the [`DataSource`] trait sources are loaded through, bundled CSV and
//! JSON loaders, and a per-run memoizing [`SourceCache`].
//!
//! # Design
//!
//! - **Row storage**: a record is a plain column→value map; all typing is
//!   declared in the mapping, never sniffed from the data.
//! - **Full materialization**: tables are loaded whole; there is no
//!   streaming. The cache guarantees one fetch per source per run.
//! - **Injected loaders**: CSV and JSON ship here; database, HTTP, XML, and
//!   SPARQL sources implement [`DataSource`] and register on the cache.

mod cache;
mod csv;
mod error;
mod json;
mod record;

pub use cache::SourceCache;
pub use csv::CsvSource;
pub use error::{SourceError, SourceResult};
pub use json::JsonSource;
pub use record::{Record, RecordTable};

use starweave_mapping::SourceRef;
use std::path::Path;

/// A loader for one kind of tabular source
///
/// `path` is the already-resolved location of the source; `source` carries
/// the declared kind and iterator. Implementations materialize the full
/// table; the per-run cache handles memoization.
pub trait DataSource {
    /// Fetch all records of the source, in source order
    fn fetch(&self, path: &Path, source: &SourceRef) -> SourceResult<RecordTable>;
}
