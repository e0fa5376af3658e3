//! Cached-triple registry and join index
//!
//! Pass 1 writes every emitted triple here together with its precomputed
//! join-key values; Pass 2 builds one hash index per annotation map over
//! the referenced map's entries and probes it per annotation record. The
//! registry lives only for the duration of a run.

use rustc_hash::FxHashMap;
use starweave_graph::Triple;

/// One triple cached during Pass 1
#[derive(Clone, Debug)]
pub struct CachedTriple {
    /// The emitted triple (graph-independent)
    pub triple: Triple,
    /// Ordinal of the originating record in its source table
    pub record_index: usize,
    /// Join-key values, one per key slot registered for the source map
    ///
    /// `None` when the record lacked the key column or it was empty; such
    /// entries never match a probe.
    pub join_keys: Vec<Option<String>>,
}

/// Registry of Pass-1 triples, keyed by source map name
///
/// Written only during Pass 1, read-only during Pass 2.
#[derive(Debug, Default)]
pub struct TripleCache {
    entries: FxHashMap<String, Vec<CachedTriple>>,
}

impl TripleCache {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a triple emitted for a map
    pub fn insert(&mut self, map: &str, cached: CachedTriple) {
        self.entries.entry(map.to_string()).or_default().push(cached);
    }

    /// All cached triples of a map, in emission order
    pub fn entries(&self, map: &str) -> &[CachedTriple] {
        self.entries.get(map).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total cached triples across all maps
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hash index over one map's cached triples for a single key slot
///
/// Built once per annotation map before any of its records are processed;
/// lookups are O(1) amortized afterwards.
pub struct JoinIndex<'a> {
    entries: &'a [CachedTriple],
    by_key: FxHashMap<&'a str, Vec<usize>>,
}

impl<'a> JoinIndex<'a> {
    /// Index `entries` by the join-key value in `slot`
    pub fn build(entries: &'a [CachedTriple], slot: usize) -> Self {
        let mut by_key: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
        for (i, cached) in entries.iter().enumerate() {
            if let Some(Some(key)) = cached.join_keys.get(slot) {
                by_key.entry(key.as_str()).or_default().push(i);
            }
        }
        Self { entries, by_key }
    }

    /// All cached triples under a probe key, in emission order
    pub fn lookup(&self, key: &str) -> impl Iterator<Item = &'a CachedTriple> + '_ {
        self.by_key
            .get(key)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }
}
