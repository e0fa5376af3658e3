//! RDF-star term types: IRI, blank node, literal, and quoted triple
//!
//! Terms are the building blocks of quads. A term can be:
//! - An IRI (always expanded, never prefixed)
//! - A blank node (with stable identifier)
//! - A literal (lexical value + explicit datatype + optional language tag)
//! - A quoted triple (RDF-star: a triple used as a term)

use crate::Triple;
use serde::{Deserialize, Serialize};
use starweave_vocab::{rdf, xsd};
use std::cmp::Ordering;
use std::sync::Arc;

/// Blank node identifier
///
/// Blank node IDs are stable within a dataset but have no meaning across
/// documents. The label does NOT include the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without the `_:` prefix)
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// An RDF-star term (subject, predicate, or object position)
///
/// # Invariants
///
/// - `Term::Iri` always contains an **expanded** IRI, never a prefixed form.
/// - For `Term::Literal` with a language tag, the datatype is `rdf:langString`.
/// - The predicate position of a quad can only be `Term::Iri`.
/// - `Term::Quoted` may appear in subject or object position only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Full expanded IRI (e.g., "http://schema.org/Person")
    Iri(Arc<str>),

    /// Blank node with stable identifier
    BlankNode(BlankId),

    /// Literal value with explicit datatype
    Literal {
        /// Lexical form of the value
        value: Arc<str>,
        /// Datatype IRI (always present; plain strings use xsd:string)
        datatype: Arc<str>,
        /// Language tag (only valid when datatype is rdf:langString)
        language: Option<Arc<str>>,
    },

    /// Quoted triple (RDF-star)
    Quoted(Box<Triple>),
}

impl Term {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// Create a plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal {
            value: Arc::from(value.as_ref()),
            datatype: Arc::from(xsd::STRING),
            language: None,
        }
    }

    /// Create a typed literal with a custom datatype IRI
    pub fn typed(value: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Term::Literal {
            value: Arc::from(value.as_ref()),
            datatype: Arc::from(datatype.as_ref()),
            language: None,
        }
    }

    /// Create a language-tagged string literal (rdf:langString)
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            value: Arc::from(value.as_ref()),
            datatype: Arc::from(rdf::LANG_STRING),
            language: Some(Arc::from(lang.as_ref())),
        }
    }

    /// Create a quoted-triple term
    pub fn quoted(triple: Triple) -> Self {
        Term::Quoted(Box::new(triple))
    }

    /// Check if this is an IRI term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Check if this is a quoted triple
    pub fn is_quoted(&self) -> bool {
        matches!(self, Term::Quoted(_))
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get as blank node ID
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get literal components (value, datatype, language)
    pub fn as_literal(&self) -> Option<(&str, &str, Option<&str>)> {
        match self {
            Term::Literal {
                value,
                datatype,
                language,
            } => Some((value, datatype, language.as_deref())),
            _ => None,
        }
    }

    /// Try to get the quoted triple
    pub fn as_quoted(&self) -> Option<&Triple> {
        match self {
            Term::Quoted(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        // Type ordering: BlankNode < Iri < Literal < Quoted
        let type_ord = |t: &Term| -> u8 {
            match t {
                Term::BlankNode(_) => 0,
                Term::Iri(_) => 1,
                Term::Literal { .. } => 2,
                Term::Quoted(_) => 3,
            }
        };

        match type_ord(self).cmp(&type_ord(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a.cmp(b),
            (Term::BlankNode(a), Term::BlankNode(b)) => a.cmp(b),
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                    language: l1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                    language: l2,
                },
            ) => (d1, l1, v1).cmp(&(d2, l2, v2)),
            (Term::Quoted(a), Term::Quoted(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "{}", id),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", value)?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if datatype.as_ref() != xsd::STRING {
                    write!(f, "^^<{}>", datatype)
                } else {
                    Ok(())
                }
            }
            Term::Quoted(t) => write!(f, "<< {} {} {} >>", t.s, t.p, t.o),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id() {
        let id = BlankId::new("b0");
        assert_eq!(id.as_str(), "b0");
        assert_eq!(format!("{}", id), "_:b0");
    }

    #[test]
    fn test_term_constructors() {
        let iri = Term::iri("http://example.org/foo");
        assert!(iri.is_iri());
        assert_eq!(iri.as_iri(), Some("http://example.org/foo"));

        let blank = Term::blank("b0");
        assert!(blank.is_blank());

        let string = Term::string("hello");
        assert!(string.is_literal());
        let (v, d, l) = string.as_literal().unwrap();
        assert_eq!(v, "hello");
        assert_eq!(d, starweave_vocab::xsd::STRING);
        assert_eq!(l, None);

        let lang = Term::lang_string("bonjour", "fr");
        let (_, d, l) = lang.as_literal().unwrap();
        assert_eq!(d, starweave_vocab::rdf::LANG_STRING);
        assert_eq!(l, Some("fr"));
    }

    #[test]
    fn test_quoted_term() {
        let inner = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );
        let quoted = Term::quoted(inner.clone());
        assert!(quoted.is_quoted());
        assert_eq!(quoted.as_quoted(), Some(&inner));
    }

    #[test]
    fn test_term_ordering() {
        let blank = Term::blank("b0");
        let iri = Term::iri("http://example.org");
        let lit = Term::string("hello");
        let quoted = Term::quoted(Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        ));

        assert!(blank < iri);
        assert!(iri < lit);
        assert!(lit < quoted);
    }

    #[test]
    fn test_term_display() {
        assert_eq!(
            format!("{}", Term::iri("http://example.org")),
            "<http://example.org>"
        );
        assert_eq!(format!("{}", Term::blank("b0")), "_:b0");
        assert_eq!(format!("{}", Term::string("hello")), "\"hello\"");
        assert_eq!(
            format!("{}", Term::lang_string("bonjour", "fr")),
            "\"bonjour\"@fr"
        );
        assert_eq!(
            format!("{}", Term::typed("42", starweave_vocab::xsd::INTEGER)),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }
}
