//! Prefix declarations and prefixed-name expansion

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from short prefix to namespace IRI
///
/// Expansion is permissive: an unrecognized prefix passes through unchanged
/// rather than failing, and is surfaced for run diagnostics instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixMap {
    map: BTreeMap<String, String>,
}

impl PrefixMap {
    /// Create an empty prefix map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix to a namespace IRI
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.map.insert(prefix.into(), namespace.into());
    }

    /// Get the namespace bound to a prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(|s| s.as_str())
    }

    /// Check if a prefix is bound
    pub fn contains(&self, prefix: &str) -> bool {
        self.map.contains_key(prefix)
    }

    /// Iterate over (prefix, namespace) pairs in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of bound prefixes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no prefixes are bound
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Expand a `prefix:local` name to an absolute IRI
    ///
    /// Names already starting with `http` (and anything without a colon)
    /// pass through unchanged, as does a name whose prefix is unbound.
    pub fn expand(&self, name: &str) -> String {
        self.expand_checked(name).0
    }

    /// Expand a prefixed name, reporting an unresolved prefix
    ///
    /// Returns the expanded (or passed-through) IRI plus the prefix name when
    /// the input looked prefixed but no binding exists. Callers tally those
    /// in run diagnostics; resolution is never an error.
    pub fn expand_checked(&self, name: &str) -> (String, Option<String>) {
        if name.starts_with("http") || name.starts_with("_:") {
            return (name.to_string(), None);
        }
        let Some((prefix, local)) = name.split_once(':') else {
            return (name.to_string(), None);
        };
        match self.map.get(prefix) {
            Some(ns) => (format!("{}{}", ns, local), None),
            None if looks_like_prefix(prefix) => {
                (name.to_string(), Some(prefix.to_string()))
            }
            None => (name.to_string(), None),
        }
    }
}

impl FromIterator<(String, String)> for PrefixMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

// Scheme-looking prefixes ("urn", "mailto") still count: only an empty name
// or one containing path characters is ruled out.
fn looks_like_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.contains('/') && !prefix.contains('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PrefixMap {
        let mut p = PrefixMap::new();
        p.insert("ex", "http://example.org/");
        p.insert("dcat", "http://www.w3.org/ns/dcat#");
        p
    }

    #[test]
    fn test_expand_bound_prefix() {
        let p = sample();
        assert_eq!(p.expand("ex:dataset/1"), "http://example.org/dataset/1");
        assert_eq!(p.expand("dcat:theme"), "http://www.w3.org/ns/dcat#theme");
    }

    #[test]
    fn test_expand_absolute_passthrough() {
        let p = sample();
        assert_eq!(p.expand("http://example.org/x"), "http://example.org/x");
        assert_eq!(p.expand("https://example.org/x"), "https://example.org/x");
    }

    #[test]
    fn test_expand_unbound_prefix_reported() {
        let p = sample();
        let (iri, unresolved) = p.expand_checked("foaf:name");
        assert_eq!(iri, "foaf:name");
        assert_eq!(unresolved.as_deref(), Some("foaf"));
    }

    #[test]
    fn test_expand_plain_name_passthrough() {
        let p = sample();
        let (iri, unresolved) = p.expand_checked("just_a_name");
        assert_eq!(iri, "just_a_name");
        assert_eq!(unresolved, None);
    }

    #[test]
    fn test_blank_node_passthrough() {
        let p = sample();
        let (iri, unresolved) = p.expand_checked("_:b0");
        assert_eq!(iri, "_:b0");
        assert_eq!(unresolved, None);
    }
}
