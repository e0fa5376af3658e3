//! Triples map structures

use crate::model::{JoinCondition, PredicateObjectSpec, SourceRef};
use crate::template::Template;
use serde::{Deserialize, Serialize};

/// How the subject term of a triples map is produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SubjectSpec {
    /// An IRI built from a template
    Template(Template),
    /// A blank node whose label is built from a template (`_:` marker)
    BlankNode(Template),
    /// A quoted reference: this map annotates triples of another map
    Quoted(JoinCondition),
}

impl SubjectSpec {
    /// Whether this subject marks the map as an annotation map
    pub fn is_quoted(&self) -> bool {
        matches!(self, SubjectSpec::Quoted(_))
    }

    /// The join condition, if this is a quoted subject
    pub fn join(&self) -> Option<&JoinCondition> {
        match self {
            SubjectSpec::Quoted(join) => Some(join),
            _ => None,
        }
    }
}

/// One named rule producing triples (or annotations) from data sources
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriplesMap {
    /// Unique name within the mapping document
    pub name: String,
    /// The data sources iterated by this map, in declaration order
    pub sources: Vec<SourceRef>,
    /// Subject specification
    pub subject: SubjectSpec,
    /// Type IRIs from `a` / `rdf:type` shorthand pairs (possibly prefixed)
    pub types: Vec<String>,
    /// Expanded predicate-object pairs, in document order
    pub pairs: Vec<PredicateObjectSpec>,
    /// Optional map-level named graph template
    pub graph: Option<Template>,
}

impl TriplesMap {
    /// Create an empty map with the given name and subject
    pub fn new(name: impl Into<String>, subject: SubjectSpec) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            subject,
            types: Vec::new(),
            pairs: Vec::new(),
            graph: None,
        }
    }

    /// Whether this map annotates another map's triples
    pub fn is_annotation(&self) -> bool {
        self.subject.is_quoted()
    }

    /// The join condition, if this is an annotation map
    pub fn join(&self) -> Option<&JoinCondition> {
        self.subject.join()
    }

    /// Map names this map depends on (join target plus quoted objects)
    pub fn referenced_maps(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        if let Some(join) = self.join() {
            refs.push(join.referenced_map.as_str());
        }
        for pair in &self.pairs {
            if let Some(name) = pair.object.quoted_ref() {
                refs.push(name);
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectSpec;

    fn t(s: &str) -> Template {
        Template::parse(s).unwrap()
    }

    #[test]
    fn test_base_map_is_not_annotation() {
        let tm = TriplesMap::new("datasetTM", SubjectSpec::Template(t("ex:dataset/$(id)")));
        assert!(!tm.is_annotation());
        assert!(tm.join().is_none());
        assert!(tm.referenced_maps().is_empty());
    }

    #[test]
    fn test_annotation_map() {
        let join = JoinCondition::new("datasetTM", t("$(dataset_id)"), t("$(dataset_id)"));
        let tm = TriplesMap::new("qualityTM", SubjectSpec::Quoted(join));
        assert!(tm.is_annotation());
        assert_eq!(tm.referenced_maps(), vec!["datasetTM"]);
    }

    #[test]
    fn test_quoted_object_is_a_dependency() {
        let mut tm = TriplesMap::new("linkTM", SubjectSpec::Template(t("ex:link/$(id)")));
        tm.pairs.push(PredicateObjectSpec::new(
            t("ex:about"),
            ObjectSpec::QuotedRef("datasetTM".to_string()),
        ));
        assert_eq!(tm.referenced_maps(), vec!["datasetTM"]);
    }
}
