//! Post-run diagnostics
//!
//! Recoverable conditions are tallied here by category instead of
//! interrupting the batch; the report is returned alongside the dataset.

use std::collections::BTreeMap;

/// Counters accumulated over one ETL run
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Triples maps fully processed
    pub maps_processed: usize,
    /// Records iterated across all maps
    pub records_processed: usize,
    /// Base quads emitted in Pass 1
    pub base_quads: usize,
    /// Reifier nodes synthesized in Pass 2
    pub reifiers: usize,
    /// Annotation quads emitted in Pass 2 (reifies links excluded)
    pub annotation_quads: usize,
    /// Quads skipped because a term could not be formed
    pub skipped_quads: usize,
    /// Maps abandoned after skipping more quads than the threshold allows
    pub aborted_maps: Vec<String>,
    /// Referenced-but-absent columns, by column name
    pub template_warnings: BTreeMap<String, usize>,
    /// Prefixed names whose prefix had no binding, by prefix
    pub unresolved_prefixes: BTreeMap<String, usize>,
}

impl RunReport {
    /// Tally columns a template referenced but the record lacked
    pub fn tally_missing_columns(&mut self, columns: &[String]) {
        for column in columns {
            *self.template_warnings.entry(column.clone()).or_insert(0) += 1;
        }
    }

    /// Tally an unresolved prefix occurrence
    pub fn tally_unresolved_prefix(&mut self, prefix: Option<String>) {
        if let Some(prefix) = prefix {
            *self.unresolved_prefixes.entry(prefix).or_insert(0) += 1;
        }
    }

    /// Total quads emitted
    pub fn total_quads(&self) -> usize {
        self.base_quads + self.reifiers + self.annotation_quads
    }

    /// Whether any recoverable condition was recorded
    pub fn has_warnings(&self) -> bool {
        self.skipped_quads > 0
            || !self.aborted_maps.is_empty()
            || !self.template_warnings.is_empty()
            || !self.unresolved_prefixes.is_empty()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "maps processed:      {}", self.maps_processed)?;
        writeln!(f, "records processed:   {}", self.records_processed)?;
        writeln!(f, "base quads:          {}", self.base_quads)?;
        writeln!(f, "reifiers:            {}", self.reifiers)?;
        writeln!(f, "annotation quads:    {}", self.annotation_quads)?;
        writeln!(f, "skipped quads:       {}", self.skipped_quads)?;
        if !self.aborted_maps.is_empty() {
            writeln!(f, "aborted maps:        {}", self.aborted_maps.join(", "))?;
        }
        if !self.template_warnings.is_empty() {
            writeln!(f, "missing columns:")?;
            for (column, count) in &self.template_warnings {
                writeln!(f, "  {}: {}", column, count)?;
            }
        }
        if !self.unresolved_prefixes.is_empty() {
            writeln!(f, "unresolved prefixes:")?;
            for (prefix, count) in &self.unresolved_prefixes {
                writeln!(f, "  {}: {}", prefix, count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies() {
        let mut report = RunReport::default();
        assert!(!report.has_warnings());

        report.tally_missing_columns(&["title".to_string(), "title".to_string()]);
        report.tally_unresolved_prefix(Some("foaf".to_string()));
        report.tally_unresolved_prefix(None);

        assert_eq!(report.template_warnings["title"], 2);
        assert_eq!(report.unresolved_prefixes["foaf"], 1);
        assert!(report.has_warnings());
    }

    #[test]
    fn test_total_quads() {
        let report = RunReport {
            base_quads: 25,
            reifiers: 25,
            annotation_quads: 125,
            ..RunReport::default()
        };
        assert_eq!(report.total_quads(), 175);
    }
}
