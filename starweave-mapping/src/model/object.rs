//! Predicate-object pair specifications

use crate::template::Template;
use serde::{Deserialize, Serialize};

/// How one object term is produced
///
/// Exactly one variant is active; generation matches exhaustively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectSpec {
    /// A literal, with optional datatype and language
    ///
    /// Datatype and language may themselves be constants or record
    /// references (`$(column)`), so both are templates.
    Literal {
        value: Template,
        datatype: Option<Template>,
        language: Option<Template>,
    },

    /// An IRI built from a template (`~iri` suffix or `type: iri`)
    Iri(Template),

    /// A quoted reference to triples produced by another map
    QuotedRef(String),
}

impl ObjectSpec {
    /// Create a plain literal spec
    pub fn literal(value: Template) -> Self {
        ObjectSpec::Literal {
            value,
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal spec
    pub fn typed(value: Template, datatype: Template) -> Self {
        ObjectSpec::Literal {
            value,
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Create a language-tagged literal spec
    pub fn lang(value: Template, language: Template) -> Self {
        ObjectSpec::Literal {
            value,
            datatype: None,
            language: Some(language),
        }
    }

    /// Create an IRI spec
    pub fn iri(value: Template) -> Self {
        ObjectSpec::Iri(value)
    }

    /// Whether this is a quoted reference
    pub fn is_quoted_ref(&self) -> bool {
        matches!(self, ObjectSpec::QuotedRef(_))
    }

    /// The referenced map name, if this is a quoted reference
    pub fn quoted_ref(&self) -> Option<&str> {
        match self {
            ObjectSpec::QuotedRef(name) => Some(name),
            _ => None,
        }
    }
}

/// One expanded predicate-object pair
///
/// The parser Cartesian-expands array-of-predicates × array-of-objects into
/// individual pairs, preserving document order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredicateObjectSpec {
    /// Predicate IRI template (usually constant, possibly prefixed)
    pub predicate: Template,
    /// The object specification
    pub object: ObjectSpec,
    /// Optional per-pair named graph template
    pub graph: Option<Template>,
}

impl PredicateObjectSpec {
    /// Create a pair in the map's default graph
    pub fn new(predicate: Template, object: ObjectSpec) -> Self {
        Self {
            predicate,
            object,
            graph: None,
        }
    }

    /// Attach a per-pair graph
    pub fn with_graph(mut self, graph: Template) -> Self {
        self.graph = Some(graph);
        self
    }
}
