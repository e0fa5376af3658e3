//! The compiled mapping document

use crate::model::TriplesMap;
use crate::prefixes::PrefixMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping author, from the `authors:` section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// WebID IRI
    pub webid: Option<String>,
}

/// A declared output target, from the `targets:` section
///
/// The engine takes its output path from configuration; targets are exposed
/// so embedders can derive defaults from the mapping itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Output locator (file path)
    pub access: String,
    /// Declared serialization, if any (e.g. "turtle", "trig")
    pub serialization: Option<String>,
}

/// The complete, immutable mapping model
///
/// Built once by the parser; read-only afterward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingModel {
    /// Prefix declarations (with rdf/rdfs/xsd defaults injected)
    pub prefixes: PrefixMap,
    /// Base IRI, if declared
    pub base: Option<String>,
    /// Mapping authors
    pub authors: Vec<Author>,
    /// External reference values (`external:` section)
    pub externals: BTreeMap<String, String>,
    /// Declared output targets by name
    pub targets: BTreeMap<String, TargetSpec>,
    maps: Vec<TriplesMap>,
}

impl MappingModel {
    /// The triples maps in document order
    pub fn maps(&self) -> &[TriplesMap] {
        &self.maps
    }

    /// Look up a triples map by name
    pub fn get(&self, name: &str) -> Option<&TriplesMap> {
        self.maps.iter().find(|m| m.name == name)
    }

    /// Number of triples maps
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the model declares no triples maps
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Replace the map collection (parser use only)
    pub(crate) fn set_maps(&mut self, maps: Vec<TriplesMap>) {
        self.maps = maps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubjectSpec;
    use crate::template::Template;

    #[test]
    fn test_model_lookup() {
        let mut model = MappingModel::default();
        model.set_maps(vec![TriplesMap::new(
            "datasetTM",
            SubjectSpec::Template(Template::parse("ex:dataset/$(id)").unwrap()),
        )]);

        assert_eq!(model.len(), 1);
        assert!(model.get("datasetTM").is_some());
        assert!(model.get("missing").is_none());
    }
}
