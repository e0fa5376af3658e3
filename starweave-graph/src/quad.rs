//! Triple and quad types
//!
//! A `Triple` is the asserted (or quoted) subject/predicate/object unit;
//! a `Quad` is a triple plus an optional named graph.

use crate::Term;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An RDF triple
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term (IRI, blank node, or quoted triple)
    pub s: Term,
    /// Predicate term (always an IRI)
    pub p: Term,
    /// Object term
    pub o: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.s, self.p, self.o)
    }
}

/// An RDF quad: a triple in an optional named graph
///
/// `graph` is `None` for the default graph and a named-graph IRI otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    /// Subject term
    pub s: Term,
    /// Predicate term (always an IRI)
    pub p: Term,
    /// Object term
    pub o: Term,
    /// Named graph IRI, or None for the default graph
    pub g: Option<Arc<str>>,
}

impl Quad {
    /// Create a quad in the default graph
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o, g: None }
    }

    /// Create a quad in a named graph
    pub fn in_graph(s: Term, p: Term, o: Term, graph: impl AsRef<str>) -> Self {
        Self {
            s,
            p,
            o,
            g: Some(Arc::from(graph.as_ref())),
        }
    }

    /// Create a quad with an optional graph
    pub fn with_graph(s: Term, p: Term, o: Term, graph: Option<&str>) -> Self {
        match graph {
            Some(g) => Self::in_graph(s, p, o, g),
            None => Self::new(s, p, o),
        }
    }

    /// Get the triple part of this quad
    pub fn triple(&self) -> Triple {
        Triple::new(self.s.clone(), self.p.clone(), self.o.clone())
    }

    /// Get the named graph IRI, if any
    pub fn graph(&self) -> Option<&str> {
        self.g.as_deref()
    }
}

impl PartialOrd for Quad {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quad {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Default graph sorts before named graphs (GSPO)
        (&self.g, &self.s, &self.p, &self.o).cmp(&(&other.g, &other.s, &other.p, &other.o))
    }
}

impl From<Triple> for Quad {
    fn from(t: Triple) -> Self {
        Quad::new(t.s, t.p, t.o)
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.g {
            Some(g) => write!(f, "{} {} {} <{}>", self.s, self.p, self.o, g),
            None => write!(f, "{} {} {}", self.s, self.p, self.o),
        }
    }
}
