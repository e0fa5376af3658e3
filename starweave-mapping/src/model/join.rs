//! Join conditions linking annotation maps to the maps they annotate

use crate::template::Template;
use serde::{Deserialize, Serialize};

/// Equality join between an annotation map and a referenced base map
///
/// `child_key` is evaluated against the annotation map's own records to
/// produce the probe key; `parent_key` is evaluated against the referenced
/// map's records when its triples are cached. Both sides use the same
/// template machinery, so key values hash consistently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinCondition {
    /// Name of the triples map whose cached triples are joined against
    pub referenced_map: String,
    /// Key template evaluated against the annotation map's own records
    pub child_key: Template,
    /// Key template evaluated against the referenced map's records
    pub parent_key: Template,
    /// Optional declared filter narrowing which matches are annotated
    pub filter: Option<JoinFilter>,
}

impl JoinCondition {
    /// Create a join condition without a filter
    pub fn new(
        referenced_map: impl Into<String>,
        child_key: Template,
        parent_key: Template,
    ) -> Self {
        Self {
            referenced_map: referenced_map.into(),
            child_key,
            parent_key,
            filter: None,
        }
    }

    /// Attach a declared match filter
    pub fn with_filter(mut self, filter: JoinFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Mapping-declared filter over join matches
///
/// Declared in the mapping document, never inferred from naming conventions.
/// All present fields must hold for a match to survive (conjunction).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinFilter {
    /// Allowlist of predicate names (compared after prefix expansion);
    /// empty means any predicate
    pub predicates: Vec<String>,
    /// Substring the matched triple's subject IRI must contain
    pub subject_contains: Option<String>,
}

impl JoinFilter {
    /// Whether this filter constrains anything at all
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.subject_contains.is_none()
    }

    /// Apply the filter to a matched triple's expanded predicate and
    /// subject representation
    pub fn matches(&self, predicate_iri: &str, subject_repr: &str) -> bool {
        if !self.predicates.is_empty() && !self.predicates.iter().any(|p| p == predicate_iri) {
            return false;
        }
        if let Some(needle) = &self.subject_contains {
            if !subject_repr.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let f = JoinFilter::default();
        assert!(f.is_empty());
        assert!(f.matches("http://example.org/p", "http://example.org/s"));
    }

    #[test]
    fn test_predicate_allowlist() {
        let f = JoinFilter {
            predicates: vec!["http://example.org/theme".to_string()],
            subject_contains: None,
        };
        assert!(f.matches("http://example.org/theme", "http://example.org/s"));
        assert!(!f.matches("http://example.org/title", "http://example.org/s"));
    }

    #[test]
    fn test_subject_substring() {
        let f = JoinFilter {
            predicates: vec![],
            subject_contains: Some("/dataset/".to_string()),
        };
        assert!(f.matches("p", "http://example.org/dataset/1"));
        assert!(!f.matches("p", "http://example.org/activity/1"));
    }

    #[test]
    fn test_conjunction() {
        let f = JoinFilter {
            predicates: vec!["http://example.org/theme".to_string()],
            subject_contains: Some("/dataset/".to_string()),
        };
        assert!(f.matches("http://example.org/theme", "http://example.org/dataset/1"));
        assert!(!f.matches("http://example.org/theme", "http://example.org/activity/1"));
        assert!(!f.matches("http://example.org/title", "http://example.org/dataset/1"));
    }
}
