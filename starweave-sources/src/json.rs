//! JSON source loader

use std::path::Path;

use serde_json::Value;

use crate::error::{SourceError, SourceResult};
use crate::record::{Record, RecordTable};
use crate::DataSource;
use starweave_mapping::SourceRef;

/// Loads JSON files holding an array of flat objects
///
/// The iterator supports the forms this dialect actually uses: `$` (the
/// document root is the array) and `$.key[*]` (the array lives under a
/// top-level key). Scalar field values are stringified; nested objects and
/// arrays are skipped.
#[derive(Debug, Default)]
pub struct JsonSource;

impl DataSource for JsonSource {
    fn fetch(&self, path: &Path, source: &SourceRef) -> SourceResult<RecordTable> {
        if !path.exists() {
            return Err(SourceError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let root: Value = serde_json::from_str(&text).map_err(|e| SourceError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let items = select_items(&root, source.iterator.as_deref()).ok_or_else(|| {
            SourceError::Json {
                path: path.to_path_buf(),
                message: format!(
                    "iterator '{}' did not select an array",
                    source.iterator.as_deref().unwrap_or("$")
                ),
            }
        })?;

        let mut columns = Vec::new();
        let mut table = RecordTable::new(Vec::new());
        for item in items {
            let Some(object) = item.as_object() else {
                continue;
            };
            let mut record = Record::new();
            for (key, value) in object {
                if let Some(rendered) = scalar_to_string(value) {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                    record.insert(key.clone(), rendered);
                }
            }
            table.push(record);
        }
        table.columns = columns;

        Ok(table)
    }
}

fn select_items<'a>(root: &'a Value, iterator: Option<&str>) -> Option<&'a Vec<Value>> {
    match iterator {
        None | Some("$") => root.as_array(),
        Some(path) => {
            let key = path.strip_prefix("$.")?;
            let key = key.strip_suffix("[*]").unwrap_or(key);
            root.get(key)?.as_array()
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
