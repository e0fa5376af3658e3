//! Tabular records
//!
//! A record is a mapping from column name to raw string value; a record
//! table is the fully materialized contents of one source, in source order.

use rustc_hash::FxHashMap;

/// One tabular record: column name → raw value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    values: FxHashMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Get a column's raw value
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|s| s.as_str())
    }

    /// Whether the record has a value for a column
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Number of columns with values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A fully materialized source table
///
/// Records appear in source order; that order is what makes engine output
/// deterministic, so it is never re-sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordTable {
    /// Column names in header order (informational; records are keyed maps)
    pub columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordTable {
    /// Create a table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// The records in source order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records in source order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
