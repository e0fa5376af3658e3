//! Explicit-reification rewriting
//!
//! Rewrites quoted-triple terms into classic `rdf:Statement` descriptions
//! for sinks that cannot consume RDF-star syntax. Each distinct quoted
//! triple gets one statement node (numbered in first-appearance order);
//! the embedding quad references that node and the four description quads
//! are emitted alongside it, in the same graph.

use rustc_hash::FxHashMap;
use starweave_graph::{Dataset, Quad, Term, Triple};
use starweave_vocab::rdf;

/// Rewrite all quoted-triple terms into explicit reification
///
/// Prefixes and base carry over unchanged. Datasets without quoted terms
/// come back identical.
pub fn expand_reification(dataset: &Dataset) -> Dataset {
    let mut out = Dataset::new();
    out.base = dataset.base.clone();
    out.prefixes = dataset.prefixes.clone();

    let mut statements: FxHashMap<Triple, Term> = FxHashMap::default();
    let mut counter = 0usize;

    for quad in dataset.iter() {
        let graph = quad.graph().map(|g| g.to_string());
        let s = rewrite_term(&quad.s, graph.as_deref(), &mut statements, &mut counter, &mut out);
        let o = rewrite_term(&quad.o, graph.as_deref(), &mut statements, &mut counter, &mut out);
        out.add(Quad::with_graph(s, quad.p.clone(), o, graph.as_deref()));
    }

    out
}

fn rewrite_term(
    term: &Term,
    graph: Option<&str>,
    statements: &mut FxHashMap<Triple, Term>,
    counter: &mut usize,
    out: &mut Dataset,
) -> Term {
    let Term::Quoted(triple) = term else {
        return term.clone();
    };

    if let Some(node) = statements.get(triple.as_ref()) {
        return node.clone();
    }

    // Inner quoted terms first, so nested annotations unfold bottom-up.
    let s = rewrite_term(&triple.s, graph, statements, counter, out);
    let o = rewrite_term(&triple.o, graph, statements, counter, out);

    let node = Term::blank(format!("st{}", *counter));
    *counter += 1;
    statements.insert(triple.as_ref().clone(), node.clone());

    out.add(Quad::with_graph(
        node.clone(),
        Term::iri(rdf::TYPE),
        Term::iri(rdf::STATEMENT),
        graph,
    ));
    out.add(Quad::with_graph(node.clone(), Term::iri(rdf::SUBJECT), s, graph));
    out.add(Quad::with_graph(
        node.clone(),
        Term::iri(rdf::PREDICATE),
        triple.p.clone(),
        graph,
    ));
    out.add(Quad::with_graph(node.clone(), Term::iri(rdf::OBJECT), o, graph));

    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted_quad() -> Quad {
        Quad::new(
            Term::blank("r0"),
            Term::iri(rdf::REIFIES),
            Term::quoted(Triple::new(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/p"),
                Term::string("o"),
            )),
        )
    }

    #[test]
    fn test_plain_dataset_unchanged() {
        let mut ds = Dataset::new();
        ds.add_triple(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );

        let out = expand_reification(&ds);
        assert_eq!(out.len(), 1);
        assert_eq!(out.quads()[0], ds.quads()[0]);
    }

    #[test]
    fn test_quoted_object_expands_to_statement() {
        let mut ds = Dataset::new();
        ds.add(quoted_quad());

        let out = expand_reification(&ds);
        // 4 description quads + the rewritten embedding quad
        assert_eq!(out.len(), 5);

        let stmt = Term::blank("st0");
        assert!(out
            .iter()
            .any(|q| q.s == stmt && q.p == Term::iri(rdf::TYPE) && q.o == Term::iri(rdf::STATEMENT)));
        assert!(out
            .iter()
            .any(|q| q.s == stmt && q.p == Term::iri(rdf::SUBJECT)));

        let embedding = out.iter().find(|q| q.p == Term::iri(rdf::REIFIES)).unwrap();
        assert_eq!(embedding.o, stmt);
    }

    #[test]
    fn test_shared_quoted_triple_reuses_statement_node() {
        let mut ds = Dataset::new();
        ds.add(quoted_quad());
        let mut second = quoted_quad();
        second.s = Term::blank("r1");
        ds.add(second);

        let out = expand_reification(&ds);
        // One statement description, two embedding quads.
        assert_eq!(out.len(), 6);
    }
}
