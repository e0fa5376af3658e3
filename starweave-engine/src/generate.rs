//! Pass 1: base quad generation
//!
//! Iterates a non-annotation triples map over its records in source order,
//! emitting one quad per declared type and per expanded predicate-object
//! pair. Every emitted triple also lands in the cached-triple registry
//! together with the join-key values any downstream annotation map will
//! probe with.

use starweave_graph::{Dataset, Quad, Term, Triple};
use starweave_mapping::{PrefixMap, Template, TriplesMap, ValueStyle};
use starweave_sources::RecordTable;
use tracing::{debug, warn};

use crate::cache::{CachedTriple, TripleCache};
use crate::error::EtlResult;
use crate::report::RunReport;
use crate::terms::{expand_iri, graph_iri, instantiate_iri, is_valid_iri, object_term, subject_term};

/// Process one base map: emit quads and populate the cache
///
/// Skipped quads count against `skip_threshold`; past it the remainder of
/// the map is abandoned and recorded in the report, without failing the run.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_base_map(
    tm: &TriplesMap,
    table: &RecordTable,
    key_templates: &[Template],
    prefixes: &PrefixMap,
    skip_threshold: usize,
    cache: &mut TripleCache,
    dataset: &mut Dataset,
    report: &mut RunReport,
) -> EtlResult<()> {
    debug!(map = %tm.name, records = table.len(), "pass 1: generating base quads");

    let quads_per_record = tm.types.len() + tm.pairs.len();
    let mut skipped = 0usize;

    'records: for (record_index, record) in table.iter().enumerate() {
        report.records_processed += 1;

        let Some(subject) = subject_term(&tm.subject, record, prefixes, report) else {
            warn!(
                map = %tm.name,
                record = record_index,
                "subject did not form a valid IRI; record skipped"
            );
            skipped += quads_per_record;
            report.skipped_quads += quads_per_record;
            if skipped > skip_threshold {
                break 'records;
            }
            continue;
        };

        // One key value per slot registered against this map. Join keys are
        // raw record values; a missing or empty key never matches.
        let join_keys: Vec<Option<String>> = key_templates
            .iter()
            .map(|kt| {
                let inst = kt.instantiate(|c| record.get(c), ValueStyle::Raw);
                (inst.missing.is_empty() && !inst.value.is_empty()).then_some(inst.value)
            })
            .collect();

        for type_name in &tm.types {
            let type_iri = expand_iri(prefixes, type_name, report);
            let triple = Triple::new(
                subject.clone(),
                Term::iri(starweave_vocab::rdf::TYPE),
                Term::iri(type_iri),
            );
            let graph = graph_iri(None, tm.graph.as_ref(), record, prefixes, report);
            emit(
                tm, triple, graph, record_index, &join_keys, cache, dataset, report,
            );
        }

        for pair in &tm.pairs {
            let predicate_iri = instantiate_iri(&pair.predicate, record, prefixes, report);
            if !is_valid_iri(&predicate_iri) {
                warn!(
                    map = %tm.name,
                    record = record_index,
                    predicate = %pair.predicate,
                    "predicate did not form a valid IRI; quad skipped"
                );
                skipped += 1;
                report.skipped_quads += 1;
                if skipped > skip_threshold {
                    break 'records;
                }
                continue;
            }

            let Some(object) = object_term(&pair.object, record, prefixes, report) else {
                warn!(
                    map = %tm.name,
                    record = record_index,
                    predicate = %predicate_iri,
                    "object did not form a valid term; quad skipped"
                );
                skipped += 1;
                report.skipped_quads += 1;
                if skipped > skip_threshold {
                    break 'records;
                }
                continue;
            };

            let triple = Triple::new(subject.clone(), Term::iri(predicate_iri), object);
            let graph = graph_iri(
                pair.graph.as_ref(),
                tm.graph.as_ref(),
                record,
                prefixes,
                report,
            );
            emit(
                tm, triple, graph, record_index, &join_keys, cache, dataset, report,
            );
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
    debug!(map = %tm.name, cached = cache.entries(&tm.name).len(), "pass 1: map complete");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn emit(
    tm: &TriplesMap,
    triple: Triple,
    graph: Option<String>,
    record_index: usize,
    join_keys: &[Option<String>],
    cache: &mut TripleCache,
    dataset: &mut Dataset,
    report: &mut RunReport,
) {
    cache.insert(
        &tm.name,
        CachedTriple {
            triple: triple.clone(),
            record_index,
            join_keys: join_keys.to_vec(),
        },
    );
    dataset.add(Quad::with_graph(
        triple.s,
        triple.p,
        triple.o,
        graph.as_deref(),
    ));
    report.base_quads += 1;
}
