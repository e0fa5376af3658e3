//! The ETL engine
//!
//! An [`Engine`] value owns the mapping model, the execution plan, the
//! source cache, the cached-triple registry, and the run configuration —
//! there is no process-wide state. A run materializes all sources first
//! (collecting every failure), executes the maps in plan order with Pass 1
//! fully complete before any dependent Pass 2 map, and returns the quad
//! stream plus a diagnostics report.

use std::path::PathBuf;
use std::sync::Arc;

use starweave_format::{FileSink, OutputFormat, QuadSink, ReificationStyle};
use starweave_graph::Dataset;
use starweave_mapping::{ExecutionPlan, MappingModel};
use starweave_sources::{RecordTable, SourceCache};
use tracing::{info, warn};

use crate::cache::TripleCache;
use crate::error::{EtlError, EtlResult};
use crate::generate::run_base_map;
use crate::reify::run_annotation_map;
use crate::report::RunReport;

/// Run configuration, consumed by the engine (never loaded from disk here)
#[derive(Clone, Debug)]
pub struct EtlConfig {
    /// Directory relative source paths resolve against
    pub data_dir: PathBuf,
    /// Final output path for [`Engine::run_and_write`]
    pub output_path: PathBuf,
    /// Output serialization format
    pub output_format: OutputFormat,
    /// Quoted-triple encoding
    pub reification: ReificationStyle,
    /// Per-map skipped-quad budget before the map aborts
    pub skip_threshold: usize,
}

impl EtlConfig {
    /// Configuration with the conventional defaults (TriG, quoted triples)
    pub fn new(data_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_path: output_path.into(),
            output_format: OutputFormat::TriG,
            reification: ReificationStyle::QuotedTriple,
            skip_threshold: 100,
        }
    }
}

/// Two-pass mapping engine for one run
pub struct Engine {
    model: MappingModel,
    plan: ExecutionPlan,
    config: EtlConfig,
    sources: SourceCache,
    cache: TripleCache,
}

impl Engine {
    /// Build an engine, validating the execution plan up front
    pub fn new(model: MappingModel, config: EtlConfig) -> EtlResult<Self> {
        let plan = ExecutionPlan::build(&model)?;
        let sources = SourceCache::new(&config.data_dir);
        Ok(Self {
            model,
            plan,
            config,
            sources,
            cache: TripleCache::new(),
        })
    }

    /// The mapping model
    pub fn model(&self) -> &MappingModel {
        &self.model
    }

    /// The computed execution plan
    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// The per-run source cache (load counters for diagnostics)
    pub fn sources(&self) -> &SourceCache {
        &self.sources
    }

    /// Replace or extend the registered source loaders
    pub fn register_source(
        &mut self,
        kind_tag: impl Into<String>,
        loader: Box<dyn starweave_sources::DataSource>,
    ) {
        self.sources.register(kind_tag, loader);
    }

    /// Execute both passes, returning the quad stream and the run report
    ///
    /// Intended to run once per engine; the cached-triple registry is not
    /// reset between calls.
    pub fn run(&mut self) -> EtlResult<(Dataset, RunReport)> {
        let mut dataset = Dataset::new();
        for (prefix, ns) in self.model.prefixes.iter() {
            dataset.add_prefix(prefix, ns);
        }
        if let Some(base) = &self.model.base {
            dataset.set_base(base.clone());
        }

        let mut report = RunReport::default();

        self.prefetch_sources()?;

        let order: Vec<String> = self.plan.order().to_vec();
        for name in &order {
            let Some(tm) = self.model.get(name).cloned() else {
                continue;
            };

            if tm.sources.is_empty() {
                warn!(map = %name, "no sources declared; map skipped");
                continue;
            }
            let table = match self.table_for(&tm) {
                Ok(table) => table,
                Err(e) => {
                    // Prefetch already succeeded; this is unreachable in
                    // practice but kept as a collected failure for safety.
                    return Err(EtlError::Sources {
                        failures: vec![(tm.sources[0].access.clone(), e)],
                    });
                }
            };

            match tm.join() {
                None => {
                    let key_templates = self.plan.key_templates(name).to_vec();
                    run_base_map(
                        &tm,
                        &table,
                        &key_templates,
                        &self.model.prefixes,
                        self.config.skip_threshold,
                        &mut self.cache,
                        &mut dataset,
                        &mut report,
                    )?;
                }
                Some(join) => {
                    let slot = self
                        .plan
                        .key_slot(&join.referenced_map, &join.parent_key)
                        .unwrap_or(0);
                    run_annotation_map(
                        &tm,
                        &table,
                        slot,
                        &self.cache,
                        &self.model.prefixes,
                        self.config.skip_threshold,
                        &mut dataset,
                        &mut report,
                    )?;
                }
            }
        }

        info!(
            quads = dataset.len(),
            reifiers = report.reifiers,
            skipped = report.skipped_quads,
            "run complete"
        );
        Ok((dataset, report))
    }

    /// Execute and hand the quad stream to a sink
    pub fn run_to_sink(&mut self, sink: &mut dyn QuadSink) -> EtlResult<RunReport> {
        let (dataset, report) = self.run()?;
        sink.write(&dataset)?;
        Ok(report)
    }

    /// Execute and publish atomically to the configured output path
    pub fn run_and_write(&mut self) -> EtlResult<RunReport> {
        let mut sink = FileSink::new(
            self.config.output_path.clone(),
            self.config.output_format,
            self.config.reification,
        );
        self.run_to_sink(&mut sink)
    }

    /// Materialize every declared source, collecting all failures
    fn prefetch_sources(&mut self) -> EtlResult<()> {
        let mut failures = Vec::new();
        let sources: Vec<_> = self
            .model
            .maps()
            .iter()
            .flat_map(|tm| tm.sources.iter().cloned())
            .collect();
        for source in sources {
            if let Err(e) = self.sources.load(&source) {
                warn!(access = %source.access, error = %e, "source failed to load");
                failures.push((source.access.clone(), e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(EtlError::Sources { failures })
        }
    }

    /// The (possibly concatenated) record table a map iterates
    fn table_for(
        &mut self,
        tm: &starweave_mapping::TriplesMap,
    ) -> Result<Arc<RecordTable>, starweave_sources::SourceError> {
        if tm.sources.len() == 1 {
            return self.sources.load(&tm.sources[0]);
        }

        // Multiple sources concatenate in declaration order, which keeps
        // record ordinals deterministic.
        let mut combined = RecordTable::default();
        for source in &tm.sources {
            let table = self.sources.load(source)?;
            if combined.columns.is_empty() {
                combined.columns = table.columns.clone();
            }
            for record in table.iter() {
                combined.push(record.clone());
            }
        }
        Ok(Arc::new(combined))
    }
}
