//! CSV source loader

use std::path::Path;

use crate::error::{SourceError, SourceResult};
use crate::record::{Record, RecordTable};
use crate::DataSource;
use starweave_mapping::SourceRef;

/// Loads CSV files with a header row
///
/// Every cell is kept as its raw string value; typing happens downstream
/// through declared datatypes, not by sniffing.
#[derive(Debug, Default)]
pub struct CsvSource;

impl DataSource for CsvSource {
    fn fetch(&self, path: &Path, _source: &SourceRef) -> SourceResult<RecordTable> {
        if !path.exists() {
            return Err(SourceError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| SourceError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SourceError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut table = RecordTable::new(headers.clone());
        for row in reader.records() {
            let row = row.map_err(|e| SourceError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            table.push(record);
        }

        Ok(table)
    }
}
