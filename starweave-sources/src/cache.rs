//! Per-run source cache
//!
//! Loading is idempotent within a run: identical source references resolve
//! to the same materialized table without re-issuing I/O. The load counter
//! makes that observable in tests and run diagnostics.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::record::RecordTable;
use crate::{CsvSource, DataSource, JsonSource};
use starweave_mapping::{SourceKind, SourceRef};

/// Memoizing loader for the tabular sources of one run
///
/// Bundled CSV and JSON loaders are registered by default; other source
/// kinds are injected with [`SourceCache::register`]. Relative access paths
/// resolve against the configured data directory.
pub struct SourceCache {
    data_dir: PathBuf,
    loaders: FxHashMap<String, Box<dyn DataSource>>,
    tables: FxHashMap<String, Arc<RecordTable>>,
    load_counts: FxHashMap<String, usize>,
}

impl SourceCache {
    /// Create a cache resolving relative paths against `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let mut cache = Self {
            data_dir: data_dir.into(),
            loaders: FxHashMap::default(),
            tables: FxHashMap::default(),
            load_counts: FxHashMap::default(),
        };
        cache.register(SourceKind::Csv.tag(), Box::new(CsvSource));
        cache.register(SourceKind::Json.tag(), Box::new(JsonSource));
        cache.register("json", Box::new(JsonSource));
        cache
    }

    /// Register (or replace) a loader for a source kind tag
    pub fn register(&mut self, kind_tag: impl Into<String>, loader: Box<dyn DataSource>) {
        self.loaders.insert(kind_tag.into(), loader);
    }

    /// Load a source, reusing the materialized table when already fetched
    pub fn load(&mut self, source: &SourceRef) -> SourceResult<Arc<RecordTable>> {
        let key = source.cache_key();
        if let Some(table) = self.tables.get(&key) {
            return Ok(Arc::clone(table));
        }

        let loader = self
            .loaders
            .get(source.kind.tag())
            .ok_or_else(|| SourceError::UnsupportedKind {
                kind: source.kind.tag().to_string(),
            })?;

        let path = self.resolve(&source.access);
        debug!(access = %source.access, path = %path.display(), "loading source");
        let table = Arc::new(loader.fetch(&path, source)?);
        debug!(access = %source.access, rows = table.len(), "source loaded");

        *self.load_counts.entry(key.clone()).or_insert(0) += 1;
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// How many times a source was actually fetched (1 once loaded)
    pub fn load_count(&self, source: &SourceRef) -> usize {
        self.load_counts
            .get(&source.cache_key())
            .copied()
            .unwrap_or(0)
    }

    fn resolve(&self, access: &str) -> PathBuf {
        let path = Path::new(access);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}
