//! Turtle and TriG writers (RDF-star)
//!
//! Output is grouped by subject with `;` predicate lists and uses the `a`
//! shorthand for `rdf:type`. Only prefixes actually referenced by the
//! emitted terms are declared. Exact layout is free; the content re-parses
//! into the same quad set.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use starweave_graph::{Dataset, Quad, Term};
use starweave_vocab::{rdf, xsd};

use crate::error::{FormatError, FormatResult};
use crate::reify::expand_reification;
use crate::text::{escape_literal, is_safe_local};
use crate::ReificationStyle;

/// Serialize a dataset to Turtle
///
/// Turtle has no named-graph syntax; a dataset holding named graphs is
/// rejected rather than silently flattened (use TriG or N-Quads instead).
pub fn write_turtle(dataset: &Dataset, style: ReificationStyle) -> FormatResult<String> {
    if dataset.iter().any(|q| q.graph().is_some()) {
        return Err(FormatError::Unserializable(
            "dataset has named graphs; Turtle cannot express them".to_string(),
        ));
    }
    Ok(write_graphs(dataset, style))
}

/// Serialize a dataset to TriG
pub fn write_trig(dataset: &Dataset, style: ReificationStyle) -> FormatResult<String> {
    Ok(write_graphs(dataset, style))
}

fn write_graphs(dataset: &Dataset, style: ReificationStyle) -> String {
    let expanded;
    let dataset = match style {
        ReificationStyle::QuotedTriple => dataset,
        ReificationStyle::Explicit => {
            expanded = expand_reification(dataset);
            &expanded
        }
    };

    let mut compactor = Compactor::new(&dataset.prefixes);
    let mut body = String::new();

    // Default graph first, then named graphs in first-appearance order.
    let default_block = subject_block(
        dataset.iter().filter(|q| q.graph().is_none()),
        &mut compactor,
        "",
    );
    body.push_str(&default_block);

    for graph in dataset.graph_names() {
        let block = subject_block(
            dataset.iter().filter(|q| q.graph() == Some(graph)),
            &mut compactor,
            "    ",
        );
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&compactor.iri(graph));
        body.push_str(" {\n");
        body.push_str(&block);
        body.push_str("}\n");
    }

    let mut out = String::new();
    for (prefix, ns) in compactor.used_prefixes() {
        out.push_str("@prefix ");
        out.push_str(prefix);
        out.push_str(": <");
        out.push_str(ns);
        out.push_str("> .\n");
    }
    if !out.is_empty() && !body.is_empty() {
        out.push('\n');
    }
    out.push_str(&body);
    out
}

/// Render a stream of same-graph quads grouped by subject
fn subject_block<'a>(
    quads: impl Iterator<Item = &'a Quad>,
    compactor: &mut Compactor<'_>,
    indent: &str,
) -> String {
    // Group by subject, preserving first-appearance order.
    let mut order: Vec<&Term> = Vec::new();
    let mut groups: FxHashMap<&Term, Vec<&Quad>> = FxHashMap::default();
    for quad in quads {
        if !groups.contains_key(&quad.s) {
            order.push(&quad.s);
        }
        groups.entry(&quad.s).or_default().push(quad);
    }

    let mut out = String::new();
    for subject in order {
        let group = &groups[subject];
        out.push_str(indent);
        out.push_str(&compactor.term(subject));
        for (i, quad) in group.iter().enumerate() {
            if i > 0 {
                out.push_str(" ;\n");
                out.push_str(indent);
                out.push_str("   ");
            }
            out.push(' ');
            out.push_str(&compactor.predicate(&quad.p));
            out.push(' ');
            out.push_str(&compactor.term(&quad.o));
        }
        out.push_str(" .\n");
    }
    out
}

/// IRI compaction against declared prefixes, tracking which are referenced
struct Compactor<'a> {
    prefixes: &'a BTreeMap<String, String>,
    used: BTreeSet<&'a str>,
}

impl<'a> Compactor<'a> {
    fn new(prefixes: &'a BTreeMap<String, String>) -> Self {
        Self {
            prefixes,
            used: BTreeSet::new(),
        }
    }

    /// The referenced (prefix, namespace) pairs, in deterministic order
    fn used_prefixes(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        let prefixes = self.prefixes;
        self.used
            .iter()
            .map(move |p| (*p, prefixes.get(*p).map(|s| s.as_str()).unwrap_or("")))
    }

    fn predicate(&mut self, term: &Term) -> String {
        if term.as_iri() == Some(rdf::TYPE) {
            return "a".to_string();
        }
        self.term(term)
    }

    fn term(&mut self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.iri(iri),
            Term::BlankNode(id) => format!("_:{}", id.as_str()),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                let mut out = format!("\"{}\"", escape_literal(value));
                if let Some(lang) = language {
                    out.push('@');
                    out.push_str(lang);
                } else if datatype.as_ref() != xsd::STRING {
                    out.push_str("^^");
                    out.push_str(&self.iri(datatype));
                }
                out
            }
            Term::Quoted(triple) => format!(
                "<< {} {} {} >>",
                self.term(&triple.s),
                self.predicate(&triple.p),
                self.term(&triple.o)
            ),
        }
    }

    fn iri(&mut self, iri: &str) -> String {
        // Longest-namespace match wins so nested namespaces compact correctly.
        let mut best: Option<(&'a str, &'a str)> = None;
        for (prefix, ns) in self.prefixes {
            if let Some(local) = iri.strip_prefix(ns.as_str()) {
                if is_safe_local(local)
                    && best.map(|(_, b)| ns.len() > b.len()).unwrap_or(true)
                {
                    best = Some((prefix.as_str(), ns.as_str()));
                }
            }
        }
        match best {
            Some((prefix, ns)) => {
                self.used.insert(prefix);
                format!("{}:{}", prefix, &iri[ns.len()..])
            }
            None => format!("<{}>", iri),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starweave_graph::Triple;

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.add_prefix("ex", "http://example.org/");
        ds.add_prefix("dcat", "http://www.w3.org/ns/dcat#");
        ds.add_prefix("unused", "http://unused.example.org/");
        ds.add_prefix("xsd", xsd::NS);

        ds.add_triple(
            Term::iri("http://example.org/dataset/1"),
            Term::iri(rdf::TYPE),
            Term::iri("http://www.w3.org/ns/dcat#Dataset"),
        );
        ds.add_triple(
            Term::iri("http://example.org/dataset/1"),
            Term::iri("http://purl.org/dc/terms/title"),
            Term::string("First"),
        );
        ds.add_triple(
            Term::iri("http://example.org/dataset/1"),
            Term::iri("http://purl.org/dc/terms/issued"),
            Term::typed("2024-01-01", xsd::DATE),
        );
        ds
    }

    #[test]
    fn test_only_referenced_prefixes_emitted() {
        let out = write_turtle(&sample(), ReificationStyle::QuotedTriple).unwrap();
        assert!(out.contains("@prefix dcat: <http://www.w3.org/ns/dcat#> ."));
        assert!(out.contains("@prefix xsd:"));
        // No emitted IRI compacts against these, so they are not declared.
        assert!(!out.contains("@prefix unused:"));
        assert!(!out.contains("@prefix ex:"));
    }

    #[test]
    fn test_type_shorthand_and_grouping() {
        let out = write_turtle(&sample(), ReificationStyle::QuotedTriple).unwrap();
        // "dataset/1" is not a safe local name, so the subject stays a full
        // IRI while dcat:Dataset compacts.
        assert!(out.contains("<http://example.org/dataset/1> a dcat:Dataset ;"));
        assert!(out.contains("\"2024-01-01\"^^xsd:date"));
        // All three pairs fold into one subject block with one terminator.
        let body: String = out
            .lines()
            .filter(|l| !l.starts_with("@prefix"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(body.matches(" .").count(), 1);
        assert_eq!(body.matches(" ;").count(), 2);
    }

    #[test]
    fn test_turtle_rejects_named_graphs() {
        let mut ds = sample();
        ds.add(Quad::in_graph(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
            "http://example.org/g",
        ));
        assert!(matches!(
            write_turtle(&ds, ReificationStyle::QuotedTriple),
            Err(FormatError::Unserializable(_))
        ));
    }

    #[test]
    fn test_trig_graph_blocks() {
        let mut ds = sample();
        ds.add(Quad::in_graph(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
            "http://example.org/meta",
        ));
        let out = write_trig(&ds, ReificationStyle::QuotedTriple).unwrap();
        assert!(out.contains("ex:meta {\n"));
        assert!(out.contains("}\n"));
    }

    #[test]
    fn test_quoted_triple_syntax() {
        let mut ds = Dataset::new();
        ds.add_prefix("ex", "http://example.org/");
        ds.add_triple(
            Term::blank("r0"),
            Term::iri(rdf::REIFIES),
            Term::quoted(Triple::new(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/p"),
                Term::string("o"),
            )),
        );
        let out = write_turtle(&ds, ReificationStyle::QuotedTriple).unwrap();
        assert!(out.contains("<< ex:s ex:p \"o\" >>"));
    }
}
