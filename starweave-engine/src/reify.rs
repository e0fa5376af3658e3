//! Pass 2: reification generation
//!
//! For each annotation map, builds a hash index over the referenced map's
//! cached triples once, then probes it per annotation record. Every
//! surviving match gets one fresh reifier node carrying a `rdf:reifies`
//! link to the matched triple plus the annotation map's predicate-object
//! quads, evaluated against the annotation record.

use starweave_graph::{Dataset, Quad, Term};
use starweave_mapping::{JoinFilter, PrefixMap, TriplesMap, ValueStyle};
use starweave_sources::{Record, RecordTable};
use tracing::{debug, warn};

use crate::cache::{CachedTriple, JoinIndex, TripleCache};
use crate::error::EtlResult;
use crate::report::RunReport;
use crate::terms::{expand_iri, graph_iri, object_term, subject_term_repr};

/// Process one annotation map against the Pass-1 cache
///
/// Skipped annotation quads count against `skip_threshold`, with the same
/// abandon-and-record semantics as Pass 1.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_annotation_map(
    tm: &TriplesMap,
    table: &RecordTable,
    key_slot: usize,
    cache: &TripleCache,
    prefixes: &PrefixMap,
    skip_threshold: usize,
    dataset: &mut Dataset,
    report: &mut RunReport,
) -> EtlResult<()> {
    let Some(join) = tm.join() else {
        return Ok(());
    };

    let entries = cache.entries(&join.referenced_map);
    let index = JoinIndex::build(entries, key_slot);
    debug!(
        map = %tm.name,
        referenced = %join.referenced_map,
        cached = entries.len(),
        records = table.len(),
        "pass 2: annotating"
    );

    // Filter predicates are declared possibly-prefixed; expand once so each
    // match comparison is IRI-against-IRI.
    let filter = join.filter.as_ref().map(|f| JoinFilter {
        predicates: f
            .predicates
            .iter()
            .map(|p| expand_iri(prefixes, p, report))
            .collect(),
        subject_contains: f.subject_contains.clone(),
    });

    let reifier_prefix = starweave_mapping::sanitize_component(&tm.name);
    let mut skipped = 0usize;

    'records: for (record_index, record) in table.iter().enumerate() {
        report.records_processed += 1;

        let probe = join.child_key.instantiate(|c| record.get(c), ValueStyle::Raw);
        if !probe.missing.is_empty() || probe.value.is_empty() {
            report.tally_missing_columns(&probe.missing);
            continue;
        }

        let mut match_ordinal = 0usize;
        for cached in index.lookup(&probe.value) {
            if !survives_filter(filter.as_ref(), cached) {
                continue;
            }

            // Fresh reifier per (cached triple, annotation record); the
            // label is derived so identical runs serialize identically.
            let reifier = Term::blank(format!(
                "{}_r{}_m{}",
                reifier_prefix, record_index, match_ordinal
            ));
            match_ordinal += 1;
            report.reifiers += 1;

            let graph = graph_iri(None, tm.graph.as_ref(), record, prefixes, report);
            dataset.add(Quad::with_graph(
                reifier.clone(),
                Term::iri(starweave_vocab::rdf::REIFIES),
                Term::quoted(cached.triple.clone()),
                graph.as_deref(),
            ));

            skipped += emit_annotation_quads(tm, &reifier, record, prefixes, dataset, report);
            if skipped > skip_threshold {
                break 'records;
            }
        }
    }

    if skipped > skip_threshold {
        warn!(
            map = %tm.name,
            skipped,
            threshold = skip_threshold,
            "skip threshold exceeded; map aborted"
        );
        report.aborted_maps.push(tm.name.clone());
    }

    report.maps_processed += 1;
    Ok(())
}

fn survives_filter(filter: Option<&JoinFilter>, cached: &CachedTriple) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let predicate = cached.triple.p.as_iri().unwrap_or_default();
    let subject = subject_term_repr(&cached.triple.s);
    filter.matches(predicate, &subject)
}

/// Emit the annotation map's own types and pairs about one reifier
///
/// Returns the number of quads skipped for this reifier.
fn emit_annotation_quads(
    tm: &TriplesMap,
    reifier: &Term,
    record: &Record,
    prefixes: &PrefixMap,
    dataset: &mut Dataset,
    report: &mut RunReport,
) -> usize {
    let mut skipped = 0usize;

    for type_name in &tm.types {
        let type_iri = expand_iri(prefixes, type_name, report);
        let graph = graph_iri(None, tm.graph.as_ref(), record, prefixes, report);
        dataset.add(Quad::with_graph(
            reifier.clone(),
            Term::iri(starweave_vocab::rdf::TYPE),
            Term::iri(type_iri),
            graph.as_deref(),
        ));
        report.annotation_quads += 1;
    }

    for pair in &tm.pairs {
        let predicate_iri =
            crate::terms::instantiate_iri(&pair.predicate, record, prefixes, report);
        if !crate::terms::is_valid_iri(&predicate_iri) {
            warn!(
                map = %tm.name,
                predicate = %pair.predicate,
                "annotation predicate did not form a valid IRI; quad skipped"
            );
            skipped += 1;
            report.skipped_quads += 1;
            continue;
        }
        let Some(object) = object_term(&pair.object, record, prefixes, report) else {
            warn!(
                map = %tm.name,
                predicate = %predicate_iri,
                "annotation object did not form a valid term; quad skipped"
            );
            skipped += 1;
            report.skipped_quads += 1;
            continue;
        };

        let graph = graph_iri(
            pair.graph.as_ref(),
            tm.graph.as_ref(),
            record,
            prefixes,
            report,
        );
        dataset.add(Quad::with_graph(
            reifier.clone(),
            Term::iri(predicate_iri),
            object,
            graph.as_deref(),
        ));
        report.annotation_quads += 1;
    }

    skipped
}
