//! Execution plan: dependency ordering over triples maps
//!
//! The plan is computed once, before any source I/O. It topologically orders
//! the triples maps so that every map is scheduled after all maps it joins
//! against, and records which join-key templates each base map must
//! precompute while its triples are cached. Unresolved references, joins
//! against annotation maps, and cycles are rejected here, never at run time.

use rustc_hash::FxHashMap;
use std::collections::BinaryHeap;

use crate::error::PlanError;
use crate::model::MappingModel;
use crate::template::Template;

/// Dependency-ordered execution schedule
#[derive(Clone, Debug)]
pub struct ExecutionPlan {
    order: Vec<String>,
    /// Base map name → distinct parent-key templates targeting it
    key_slots: FxHashMap<String, Vec<Template>>,
}

impl ExecutionPlan {
    /// Build the plan for a mapping model
    pub fn build(model: &MappingModel) -> Result<Self, PlanError> {
        validate_references(model)?;

        let order = topological_order(model)?;
        let key_slots = collect_key_slots(model);

        Ok(Self { order, key_slots })
    }

    /// Map names in execution order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// The distinct parent-key templates a base map must evaluate per record
    pub fn key_templates(&self, map: &str) -> &[Template] {
        self.key_slots.get(map).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Position of a parent-key template in a base map's slot list
    pub fn key_slot(&self, map: &str, parent_key: &Template) -> Option<usize> {
        self.key_slots
            .get(map)?
            .iter()
            .position(|t| t == parent_key)
    }
}

fn validate_references(model: &MappingModel) -> Result<(), PlanError> {
    for tm in model.maps() {
        for pair in &tm.pairs {
            if pair.object.is_quoted_ref() {
                // Parsed into the model, but the generator has no join key
                // to select which of the referenced map's triples to quote.
                return Err(PlanError::Unsupported {
                    map: tm.name.clone(),
                    feature: "quoted object maps".to_string(),
                });
            }
        }
        for referenced in tm.referenced_maps() {
            let target = model
                .get(referenced)
                .ok_or_else(|| PlanError::UnknownMap {
                    map: tm.name.clone(),
                    referenced: referenced.to_string(),
                })?;
            if target.is_annotation() {
                return Err(PlanError::AnnotationReference {
                    map: tm.name.clone(),
                    referenced: referenced.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Kahn's algorithm, stabilized on document order
fn topological_order(model: &MappingModel) -> Result<Vec<String>, PlanError> {
    let maps = model.maps();
    let index_of: FxHashMap<&str, usize> = maps
        .iter()
        .enumerate()
        .map(|(i, tm)| (tm.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; maps.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); maps.len()];

    for (i, tm) in maps.iter().enumerate() {
        for referenced in tm.referenced_maps() {
            let j = index_of[referenced];
            dependents[j].push(i);
            in_degree[i] += 1;
        }
    }

    // Min-heap over document index keeps the schedule deterministic.
    let mut ready: BinaryHeap<std::cmp::Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| std::cmp::Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(maps.len());
    while let Some(std::cmp::Reverse(i)) = ready.pop() {
        order.push(maps[i].name.clone());
        for &dep in &dependents[i] {
            in_degree[dep] -= 1;
            if in_degree[dep] == 0 {
                ready.push(std::cmp::Reverse(dep));
            }
        }
    }

    if order.len() != maps.len() {
        let involved = maps
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, tm)| tm.name.clone())
            .collect();
        return Err(PlanError::Cycle { involved });
    }

    Ok(order)
}

fn collect_key_slots(model: &MappingModel) -> FxHashMap<String, Vec<Template>> {
    let mut slots: FxHashMap<String, Vec<Template>> = FxHashMap::default();
    for tm in model.maps() {
        if let Some(join) = tm.join() {
            let entry = slots.entry(join.referenced_map.clone()).or_default();
            if !entry.contains(&join.parent_key) {
                entry.push(join.parent_key.clone());
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    const ANNOTATED: &str = r#"
prefixes:
  ex: "http://example.org/"
mappings:
  qualityTM:
    sources:
      - ['quality.csv~csv']
    subject:
      - function: join(quoted=datasetTM, equal(str1=$(dataset_id), str2=$(dataset_id)))
    predicateobjects:
      - [ex:score, $(score)]
  datasetTM:
    sources:
      - ['datasets.csv~csv']
    subject: ex:dataset/$(dataset_id)
    predicateobjects:
      - [ex:title, $(title)]
"#;

    #[test]
    fn test_annotation_scheduled_after_base() {
        let model = parse_str(ANNOTATED).unwrap();
        let plan = ExecutionPlan::build(&model).unwrap();
        // qualityTM comes first in the document but depends on datasetTM.
        assert_eq!(plan.order(), &["datasetTM", "qualityTM"]);
    }

    #[test]
    fn test_key_slots_collected_for_base_map() {
        let model = parse_str(ANNOTATED).unwrap();
        let plan = ExecutionPlan::build(&model).unwrap();

        let templates = plan.key_templates("datasetTM");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].source(), "$(dataset_id)");

        let join = model.get("qualityTM").unwrap().join().unwrap();
        assert_eq!(plan.key_slot("datasetTM", &join.parent_key), Some(0));
    }

    #[test]
    fn test_base_maps_keep_document_order() {
        let doc = r#"
mappings:
  bTM:
    sources: [['b.csv~csv']]
    subject: ex:b/$(id)
    predicateobjects:
      - [ex:name, $(name)]
  aTM:
    sources: [['a.csv~csv']]
    subject: ex:a/$(id)
    predicateobjects:
      - [ex:name, $(name)]
"#;
        let model = parse_str(doc).unwrap();
        let plan = ExecutionPlan::build(&model).unwrap();
        assert_eq!(plan.order(), &["bTM", "aTM"]);
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let doc = r#"
mappings:
  qualityTM:
    sources: [['quality.csv~csv']]
    subject:
      - function: join(quoted=missingTM, equal(str1=$(id), str2=$(id)))
    predicateobjects:
      - [ex:score, $(score)]
"#;
        let model = parse_str(doc).unwrap();
        let err = ExecutionPlan::build(&model).unwrap_err();
        assert!(matches!(err, PlanError::UnknownMap { referenced, .. } if referenced == "missingTM"));
    }

    #[test]
    fn test_annotation_reference_rejected() {
        let doc = r#"
mappings:
  firstTM:
    sources: [['first.csv~csv']]
    subject:
      - function: join(quoted=secondTM, equal(str1=$(id), str2=$(id)))
    predicateobjects:
      - [ex:score, $(score)]
  secondTM:
    sources: [['second.csv~csv']]
    subject:
      - function: join(quoted=firstTM, equal(str1=$(id), str2=$(id)))
    predicateobjects:
      - [ex:score, $(score)]
"#;
        let model = parse_str(doc).unwrap();
        let err = ExecutionPlan::build(&model).unwrap_err();
        assert!(matches!(err, PlanError::AnnotationReference { .. }));
    }

    #[test]
    fn test_quoted_object_rejected_at_plan_time() {
        let doc = r#"
mappings:
  datasetTM:
    sources: [['datasets.csv~csv']]
    subject: ex:dataset/$(id)
    predicateobjects:
      - [ex:title, $(title)]
  linkTM:
    sources: [['links.csv~csv']]
    subject: ex:link/$(id)
    predicateobjects:
      - predicates: ex:about
        objects:
          quoted: datasetTM
"#;
        let model = parse_str(doc).unwrap();
        let err = ExecutionPlan::build(&model).unwrap_err();
        assert!(matches!(err, PlanError::Unsupported { .. }));
    }
}
