//! Data source references

use serde::{Deserialize, Serialize};

/// The kind of a tabular source, from the `~tag` / referenceFormulation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// CSV file (`~csv`)
    Csv,
    /// JSON file iterated with a jsonpath (`~jsonpath`)
    Json,
    /// Any other formulation; resolved by an injected loader
    Other(String),
}

impl SourceKind {
    /// Parse a source kind from its YARRRML tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "csv" => SourceKind::Csv,
            "json" | "jsonpath" => SourceKind::Json,
            other => SourceKind::Other(other.to_string()),
        }
    }

    /// The tag naming this kind
    pub fn tag(&self) -> &str {
        match self {
            SourceKind::Csv => "csv",
            SourceKind::Json => "jsonpath",
            SourceKind::Other(tag) => tag,
        }
    }
}

/// A reference to one tabular data source
///
/// Identity for caching purposes is `(access, iterator)`: two references to
/// the same file with the same iterator resolve to the same cached table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Path or locator of the source (YARRRML `access`)
    pub access: String,
    /// Source kind (YARRRML `referenceFormulation` / `~tag`)
    pub kind: SourceKind,
    /// Optional record iterator (e.g. a jsonpath for JSON sources)
    pub iterator: Option<String>,
}

impl SourceRef {
    /// Create a CSV source reference
    pub fn csv(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            kind: SourceKind::Csv,
            iterator: None,
        }
    }

    /// Create a JSON source reference
    pub fn json(access: impl Into<String>, iterator: Option<String>) -> Self {
        Self {
            access: access.into(),
            kind: SourceKind::Json,
            iterator,
        }
    }

    /// Parse the shorthand `path~tag` form
    pub fn from_shorthand(spec: &str, iterator: Option<String>) -> Self {
        let (access, tag) = match spec.split_once('~') {
            Some((path, tag)) => (path, tag),
            None => (spec, "csv"),
        };
        Self {
            access: access.to_string(),
            kind: SourceKind::from_tag(tag),
            iterator,
        }
    }

    /// Cache key for per-run memoization
    pub fn cache_key(&self) -> String {
        match &self.iterator {
            Some(it) => format!("{}#{}", self.access, it),
            None => self.access.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_with_tag() {
        let s = SourceRef::from_shorthand("data/products.csv~csv", None);
        assert_eq!(s.access, "data/products.csv");
        assert_eq!(s.kind, SourceKind::Csv);
    }

    #[test]
    fn test_shorthand_defaults_to_csv() {
        let s = SourceRef::from_shorthand("products.csv", None);
        assert_eq!(s.kind, SourceKind::Csv);
    }

    #[test]
    fn test_shorthand_jsonpath() {
        let s = SourceRef::from_shorthand("data/person.json~jsonpath", Some("$".to_string()));
        assert_eq!(s.kind, SourceKind::Json);
        assert_eq!(s.iterator.as_deref(), Some("$"));
        assert_eq!(s.cache_key(), "data/person.json#$");
    }

    #[test]
    fn test_other_kind_round_trips_tag() {
        let s = SourceRef::from_shorthand("query.sql~sql", None);
        assert_eq!(s.kind, SourceKind::Other("sql".to_string()));
        assert_eq!(s.kind.tag(), "sql");
    }
}
