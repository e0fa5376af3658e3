//! Term materialization
//!
//! Turns subject/object specifications into RDF terms for one record.
//! Template misses substitute the sentinel and are tallied; a value that
//! cannot form a valid term yields `None` so the caller can skip the quad
//! and count it against the map's skip threshold.

use starweave_graph::Term;
use starweave_mapping::{ObjectSpec, PrefixMap, SubjectSpec, Template, ValueStyle};
use starweave_sources::Record;

use crate::report::RunReport;

/// Expand a possibly-prefixed name, tallying unresolved prefixes
pub(crate) fn expand_iri(prefixes: &PrefixMap, name: &str, report: &mut RunReport) -> String {
    let (iri, unresolved) = prefixes.expand_checked(name);
    report.tally_unresolved_prefix(unresolved);
    iri
}

/// Characters RFC 3987 forbids anywhere in an IRI
pub(crate) fn is_valid_iri(iri: &str) -> bool {
    !iri.is_empty()
        && !iri
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`'))
}

/// Render an IRI-position template: sanitize, expand, tally
pub(crate) fn instantiate_iri(
    template: &Template,
    record: &Record,
    prefixes: &PrefixMap,
    report: &mut RunReport,
) -> String {
    let inst = template.instantiate(|c| record.get(c), ValueStyle::IriSafe);
    report.tally_missing_columns(&inst.missing);
    expand_iri(prefixes, &inst.value, report)
}

/// Render a literal-position template: raw values, tally misses
pub(crate) fn instantiate_raw(
    template: &Template,
    record: &Record,
    report: &mut RunReport,
) -> String {
    let inst = template.instantiate(|c| record.get(c), ValueStyle::Raw);
    report.tally_missing_columns(&inst.missing);
    inst.value
}

/// Materialize the subject term for one record
///
/// Returns `None` when the rendered subject is not a valid IRI.
pub(crate) fn subject_term(
    spec: &SubjectSpec,
    record: &Record,
    prefixes: &PrefixMap,
    report: &mut RunReport,
) -> Option<Term> {
    match spec {
        SubjectSpec::Template(template) => {
            let iri = instantiate_iri(template, record, prefixes, report);
            is_valid_iri(&iri).then(|| Term::iri(iri))
        }
        SubjectSpec::BlankNode(template) => {
            // IriSafe rendering collapses anything label-unsafe already.
            let inst = template.instantiate(|c| record.get(c), ValueStyle::IriSafe);
            report.tally_missing_columns(&inst.missing);
            Some(Term::blank(inst.value))
        }
        // Annotation subjects are synthesized in Pass 2, not materialized here.
        SubjectSpec::Quoted(_) => None,
    }
}

/// Materialize an object term for one record
///
/// Returns `None` when the value cannot form a valid term (skip-and-tally
/// semantics at the caller). Quoted references are resolved in Pass 2 and
/// rejected at plan time, so they never reach this point.
pub(crate) fn object_term(
    spec: &ObjectSpec,
    record: &Record,
    prefixes: &PrefixMap,
    report: &mut RunReport,
) -> Option<Term> {
    match spec {
        ObjectSpec::Iri(template) => {
            // A bare column holding an absolute IRI is used verbatim;
            // everything else goes through sanitized instantiation.
            if let Some(column) = template.single_var() {
                if let Some(value) = record.get(column) {
                    if value.starts_with("http://") || value.starts_with("https://") {
                        return is_valid_iri(value).then(|| Term::iri(value));
                    }
                }
            }
            let iri = instantiate_iri(template, record, prefixes, report);
            is_valid_iri(&iri).then(|| Term::iri(iri))
        }

        ObjectSpec::Literal {
            value,
            datatype,
            language,
        } => {
            let lexical = instantiate_raw(value, record, report);

            if let Some(language) = language {
                let tag = instantiate_raw(language, record, report);
                return Some(Term::lang_string(lexical, tag));
            }

            match datatype {
                Some(datatype) => {
                    let name = instantiate_raw(datatype, record, report);
                    let iri = expand_iri(prefixes, &name, report);
                    is_valid_iri(&iri).then(|| Term::typed(lexical, iri))
                }
                None => Some(Term::string(lexical)),
            }
        }

        ObjectSpec::QuotedRef(_) => None,
    }
}

/// The subject representation join filters match substrings against
///
/// IRIs compare by their expanded form, blank nodes by `_:label`.
pub(crate) fn subject_term_repr(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.to_string(),
        other => other.to_string(),
    }
}

/// Resolve the named graph for a quad: pair graph wins over map graph
pub(crate) fn graph_iri(
    pair_graph: Option<&Template>,
    map_graph: Option<&Template>,
    record: &Record,
    prefixes: &PrefixMap,
    report: &mut RunReport,
) -> Option<String> {
    let template = pair_graph.or(map_graph)?;
    let iri = instantiate_iri(template, record, prefixes, report);
    is_valid_iri(&iri).then_some(iri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starweave_mapping::parse_str;

    fn prefixes() -> PrefixMap {
        let model = parse_str("prefixes:\n  ex: \"http://example.org/\"\nmappings: {}\n").unwrap();
        model.prefixes
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut rec = Record::new();
        for (k, v) in pairs {
            rec.insert(*k, *v);
        }
        rec
    }

    fn t(s: &str) -> Template {
        Template::parse(s).unwrap()
    }

    #[test]
    fn test_subject_template() {
        let mut report = RunReport::default();
        let rec = record(&[("id", "42")]);
        let term = subject_term(
            &SubjectSpec::Template(t("ex:dataset/$(id)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        assert_eq!(term.as_iri(), Some("http://example.org/dataset/42"));
    }

    #[test]
    fn test_subject_blank_node() {
        let mut report = RunReport::default();
        let rec = record(&[("id", "42")]);
        let term = subject_term(
            &SubjectSpec::BlankNode(t("row_$(id)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        assert_eq!(term.as_blank().unwrap().as_str(), "row_42");
    }

    #[test]
    fn test_object_literal_keeps_raw_text() {
        let mut report = RunReport::default();
        let rec = record(&[("title", "Solar Panels 2024")]);
        let term = object_term(
            &ObjectSpec::literal(t("$(title)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        assert_eq!(
            term.as_literal().unwrap().0,
            "Solar Panels 2024"
        );
    }

    #[test]
    fn test_object_typed_literal_expands_datatype() {
        let mut report = RunReport::default();
        let rec = record(&[("issued", "2024-01-01")]);
        let term = object_term(
            &ObjectSpec::typed(t("$(issued)"), t("xsd:date")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        let (value, datatype, _) = term.as_literal().unwrap();
        assert_eq!(value, "2024-01-01");
        assert_eq!(datatype, starweave_vocab::xsd::DATE);
    }

    #[test]
    fn test_object_datatype_from_record_reference() {
        let mut report = RunReport::default();
        let rec = record(&[("v", "12"), ("dt", "xsd:integer")]);
        let term = object_term(
            &ObjectSpec::typed(t("$(v)"), t("$(dt)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        assert_eq!(
            term.as_literal().unwrap().1,
            starweave_vocab::xsd::INTEGER
        );
    }

    #[test]
    fn test_object_iri_template() {
        let mut report = RunReport::default();
        let rec = record(&[("theme", "renewable energy")]);
        let term = object_term(
            &ObjectSpec::iri(t("ex:theme/$(theme)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        assert_eq!(
            term.as_iri(),
            Some("http://example.org/theme/renewable_energy")
        );
    }

    #[test]
    fn test_object_iri_column_with_absolute_value() {
        let mut report = RunReport::default();
        let rec = record(&[("homepage", "https://example.org/alice?tab=1")]);
        let term = object_term(
            &ObjectSpec::iri(t("$(homepage)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        // Absolute IRIs from the data are used verbatim, not sanitized.
        assert_eq!(term.as_iri(), Some("https://example.org/alice?tab=1"));
    }

    #[test]
    fn test_invalid_iri_object_is_skipped() {
        let mut report = RunReport::default();
        let rec = record(&[("homepage", "http://example.org/has space")]);
        let term = object_term(
            &ObjectSpec::iri(t("$(homepage)")),
            &rec,
            &prefixes(),
            &mut report,
        );
        assert!(term.is_none());
    }

    #[test]
    fn test_missing_column_tally() {
        let mut report = RunReport::default();
        let rec = record(&[]);
        let term = object_term(
            &ObjectSpec::literal(t("$(absent)")),
            &rec,
            &prefixes(),
            &mut report,
        )
        .unwrap();
        assert_eq!(term.as_literal().unwrap().0, "unknown");
        assert_eq!(report.template_warnings["absent"], 1);
    }

    #[test]
    fn test_graph_precedence() {
        let mut report = RunReport::default();
        let rec = record(&[]);
        let pair = t("ex:PairGraph");
        let map = t("ex:MapGraph");

        let g = graph_iri(Some(&pair), Some(&map), &rec, &prefixes(), &mut report);
        assert_eq!(g.as_deref(), Some("http://example.org/PairGraph"));

        let g = graph_iri(None, Some(&map), &rec, &prefixes(), &mut report);
        assert_eq!(g.as_deref(), Some("http://example.org/MapGraph"));

        assert_eq!(graph_iri(None, None, &rec, &prefixes(), &mut report), None);
    }
}
