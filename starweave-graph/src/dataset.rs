//! RDF dataset - a collection of quads
//!
//! The `Dataset` type uses `Vec<Quad>` to preserve emission order and
//! duplicates (bag semantics). Call `dedupe()` explicitly for set semantics.

use crate::{Quad, Term};
use std::collections::BTreeMap;

/// A collection of RDF quads with prefix bindings
///
/// # Design Decisions
///
/// - **Vec storage**: preserves the generator's deterministic emission order.
/// - **Explicit deduplication**: call `dedupe()` if you want set semantics.
/// - **BTreeMap prefixes**: deterministic prefix iteration for formatters.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    /// The quads in this dataset
    quads: Vec<Quad>,
    /// Base IRI, if declared
    pub base: Option<String>,
    /// Prefix mappings (short prefix → namespace IRI)
    pub prefixes: BTreeMap<String, String>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base IRI
    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    /// Add a prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Add a quad to the dataset
    pub fn add(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    /// Add a quad by components in the default graph
    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Quad::new(s, p, o));
    }

    /// Get the number of quads
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Iterate over quads in emission order
    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Sort quads by GSPO for order-independent comparison
    pub fn sort(&mut self) {
        self.quads.sort();
    }

    /// Remove duplicate quads (apply set semantics)
    ///
    /// Sorts first so duplicates are adjacent; the result is canonical.
    pub fn dedupe(&mut self) {
        self.quads.sort();
        self.quads.dedup();
    }

    /// Get all quads (consuming the dataset)
    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }

    /// Get a reference to the quads
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// The distinct named-graph IRIs, in first-appearance order
    pub fn graph_names(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for quad in &self.quads {
            if let Some(g) = quad.graph() {
                if !seen.contains(&g) {
                    seen.push(g);
                }
            }
        }
        seen
    }
}

impl IntoIterator for Dataset {
    type Item = Quad;
    type IntoIter = std::vec::IntoIter<Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Quad;
    type IntoIter = std::slice::Iter<'a, Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.iter()
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        Dataset {
            quads: iter.into_iter().collect(),
            base: None,
            prefixes: BTreeMap::new(),
        }
    }
}

impl Extend<Quad> for Dataset {
    fn extend<T: IntoIterator<Item = Quad>>(&mut self, iter: T) {
        self.quads.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_dataset() -> Dataset {
        let mut ds = Dataset::new();
        ds.add_triple(
            Term::iri("http://example.org/bob"),
            Term::iri("http://xmlns.com/foaf/0.1/name"),
            Term::string("Bob"),
        );
        ds.add_triple(
            Term::iri("http://example.org/alice"),
            Term::iri("http://xmlns.com/foaf/0.1/name"),
            Term::string("Alice"),
        );
        ds
    }

    #[test]
    fn test_dataset_creation() {
        let ds = Dataset::new();
        assert!(ds.is_empty());
        assert_eq!(ds.len(), 0);
    }

    #[test]
    fn test_dataset_preserves_emission_order() {
        let ds = make_test_dataset();
        let first = ds.iter().next().unwrap();
        assert_eq!(first.s.as_iri(), Some("http://example.org/bob"));
    }

    #[test]
    fn test_dataset_sort() {
        let mut ds = make_test_dataset();
        ds.sort();
        let first = ds.iter().next().unwrap();
        assert_eq!(first.s.as_iri(), Some("http://example.org/alice"));
    }

    #[test]
    fn test_dataset_dedupe() {
        let mut ds = Dataset::new();
        let q = Quad::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );
        ds.add(q.clone());
        ds.add(q.clone());
        ds.add(q);
        assert_eq!(ds.len(), 3);

        ds.dedupe();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_graph_names_first_appearance_order() {
        let mut ds = Dataset::new();
        ds.add(Quad::in_graph(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
            "http://example.org/g2",
        ));
        ds.add(Quad::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        ));
        ds.add(Quad::in_graph(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
            "http://example.org/g1",
        ));
        assert_eq!(
            ds.graph_names(),
            vec!["http://example.org/g2", "http://example.org/g1"]
        );
    }
}
