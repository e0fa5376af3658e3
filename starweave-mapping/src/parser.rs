//! YARRRML-star mapping parser
//!
//! Parses the YAML mapping dialect into an immutable [`MappingModel`].
//! The dialect is shorthand-heavy and positional, so parsing walks
//! `serde_yaml::Value` directly rather than deriving.
//!
//! Supported forms:
//! - `prefixes:` declarations, with `rdf`/`rdfs`/`xsd` injected when absent
//! - `base:`, `authors:` (object, shortcut, and WebID forms), `external:`
//! - document-level named `sources:` plus inline per-map sources in
//!   shorthand (`['file.csv~csv']`) and long (`access:` /
//!   `referenceFormulation:` / `iterator:`) form
//! - subjects as templates, `_:` blank-node templates, or quoted-join
//!   functions with an optional declared `filter:` block
//! - `predicateobjects:` shorthand tuples and long `predicates:`/`objects:`
//!   form, Cartesian-expanded, with `a`/`rdf:type` shorthand, `~iri` and
//!   `~lang` markers, datatype/language references, and per-pair graphs
//! - map-level `graphs:` and document-level `targets:`

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{MappingResult, ParseError};
use crate::model::{
    Author, JoinCondition, JoinFilter, MappingModel, ObjectSpec, PredicateObjectSpec, SourceRef,
    SubjectSpec, TargetSpec, TriplesMap,
};
use crate::prefixes::PrefixMap;
use crate::template::Template;

/// Parse a YARRRML-star mapping document
pub fn parse_str(input: &str) -> MappingResult<MappingModel> {
    let root: Value = serde_yaml::from_str(input)?;
    let doc = root.as_mapping().ok_or(ParseError::NotAMapping)?;

    let mut model = MappingModel::default();
    let mut named_sources: BTreeMap<String, SourceRef> = BTreeMap::new();

    // First pass: everything except mappings, so named sources are known
    // regardless of key order.
    for (key, value) in doc {
        let key = key.as_str().ok_or_else(|| ParseError::InvalidValue {
            key: "document".to_string(),
            message: "top-level keys must be strings".to_string(),
        })?;
        match key {
            "prefixes" => model.prefixes = parse_prefixes(value)?,
            "base" => model.base = Some(scalar_string(value, "base")?),
            "authors" => model.authors = parse_authors(value)?,
            "external" => model.externals = parse_externals(value)?,
            "sources" => named_sources = parse_named_sources(value)?,
            "targets" => model.targets = parse_targets(value)?,
            "mappings" | "mapping" => {}
            other => return Err(ParseError::UnknownKey(other.to_string())),
        }
    }

    inject_default_prefixes(&mut model.prefixes);

    // Second pass: the mappings themselves.
    let mut maps = Vec::new();
    for (key, value) in doc {
        let key = key.as_str().unwrap_or_default();
        if key == "mappings" || key == "mapping" {
            let section = value.as_mapping().ok_or_else(|| ParseError::InvalidValue {
                key: "mappings".to_string(),
                message: "must be a mapping of name to definition".to_string(),
            })?;
            for (name, def) in section {
                let name = name.as_str().ok_or_else(|| ParseError::InvalidValue {
                    key: "mappings".to_string(),
                    message: "map names must be strings".to_string(),
                })?;
                maps.push(parse_triples_map(name, def, &named_sources)?);
            }
        }
    }
    model.set_maps(maps);

    Ok(model)
}

fn inject_default_prefixes(prefixes: &mut PrefixMap) {
    for (prefix, ns) in starweave_vocab::defaults::PREFIXES {
        if !prefixes.contains(prefix) {
            prefixes.insert(*prefix, *ns);
        }
    }
}

fn parse_prefixes(value: &Value) -> MappingResult<PrefixMap> {
    let map = value.as_mapping().ok_or_else(|| ParseError::InvalidValue {
        key: "prefixes".to_string(),
        message: "must be a mapping of prefix to namespace IRI".to_string(),
    })?;
    let mut prefixes = PrefixMap::new();
    for (k, v) in map {
        let prefix = k.as_str().ok_or_else(|| ParseError::InvalidValue {
            key: "prefixes".to_string(),
            message: "prefixes must be strings".to_string(),
        })?;
        let ns = v.as_str().ok_or_else(|| ParseError::InvalidValue {
            key: "prefixes".to_string(),
            message: format!("namespace for '{}' must be a string", prefix),
        })?;
        prefixes.insert(prefix, ns);
    }
    Ok(prefixes)
}

fn parse_externals(value: &Value) -> MappingResult<BTreeMap<String, String>> {
    let map = value.as_mapping().ok_or_else(|| ParseError::InvalidValue {
        key: "external".to_string(),
        message: "must be a mapping of name to value".to_string(),
    })?;
    let mut externals = BTreeMap::new();
    for (k, v) in map {
        if let (Some(name), Ok(val)) = (k.as_str(), scalar_string(v, "external")) {
            externals.insert(name.to_string(), val);
        }
    }
    Ok(externals)
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

fn parse_authors(value: &Value) -> MappingResult<Vec<Author>> {
    let entries: Vec<&Value> = match value {
        Value::Sequence(seq) => seq.iter().collect(),
        other => vec![other],
    };
    entries.iter().map(|v| parse_author(v)).collect()
}

fn parse_author(value: &Value) -> MappingResult<Author> {
    match value {
        Value::String(s) => Ok(parse_author_shortcut(s)),
        Value::Mapping(map) => {
            let field = |key: &str| {
                map.get(key)
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            };
            Ok(Author {
                name: field("name"),
                email: field("email"),
                website: field("website"),
                webid: field("webid"),
            })
        }
        _ => Err(ParseError::InvalidValue {
            key: "authors".to_string(),
            message: "each author must be a string or a mapping".to_string(),
        }),
    }
}

// Shortcut forms: "Name <email> (website)" and bare WebID IRIs.
fn parse_author_shortcut(raw: &str) -> Author {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Author {
            webid: Some(raw.to_string()),
            ..Author::default()
        };
    }

    let mut author = Author::default();
    let mut name_end = raw.len();

    if let (Some(start), Some(end)) = (raw.find('<'), raw.find('>')) {
        if start < end {
            author.email = Some(raw[start + 1..end].trim().to_string());
            name_end = name_end.min(start);
        }
    }
    if let (Some(start), Some(end)) = (raw.find('('), raw.find(')')) {
        if start < end {
            author.website = Some(raw[start + 1..end].trim().to_string());
            name_end = name_end.min(start);
        }
    }

    let name = raw[..name_end].trim();
    if !name.is_empty() {
        author.name = Some(name.to_string());
    }
    author
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

fn parse_named_sources(value: &Value) -> MappingResult<BTreeMap<String, SourceRef>> {
    let map = value.as_mapping().ok_or_else(|| ParseError::InvalidValue {
        key: "sources".to_string(),
        message: "must be a mapping of name to source".to_string(),
    })?;
    let mut sources = BTreeMap::new();
    for (k, v) in map {
        let name = k.as_str().ok_or_else(|| ParseError::InvalidValue {
            key: "sources".to_string(),
            message: "source names must be strings".to_string(),
        })?;
        sources.insert(name.to_string(), parse_source_entry(v)?);
    }
    Ok(sources)
}

fn parse_source_entry(value: &Value) -> MappingResult<SourceRef> {
    match value {
        // Shortcut: [access~tag, iterator?]
        Value::Sequence(seq) => {
            let spec = seq
                .first()
                .and_then(|v| v.as_str())
                .ok_or_else(|| ParseError::InvalidValue {
                    key: "sources".to_string(),
                    message: "shorthand source must start with 'access~format'".to_string(),
                })?;
            let iterator = seq.get(1).and_then(|v| v.as_str()).map(|s| s.to_string());
            Ok(SourceRef::from_shorthand(spec, iterator))
        }
        // Long form: access / referenceFormulation / iterator
        Value::Mapping(map) => {
            let field = |key: &str| {
                map.get(key)
                    .and_then(|v| v.as_str())
            };
            let access = field("access").ok_or_else(|| ParseError::InvalidValue {
                key: "sources".to_string(),
                message: "long-form source requires 'access'".to_string(),
            })?;
            let kind = field("referenceFormulation").unwrap_or("csv");
            Ok(SourceRef {
                access: access.to_string(),
                kind: crate::model::SourceKind::from_tag(kind),
                iterator: field("iterator").map(|s| s.to_string()),
            })
        }
        _ => Err(ParseError::InvalidValue {
            key: "sources".to_string(),
            message: "source must be a shorthand list or a mapping".to_string(),
        }),
    }
}

fn parse_mapping_sources(
    map_name: &str,
    value: &Value,
    named: &BTreeMap<String, SourceRef>,
) -> MappingResult<Vec<SourceRef>> {
    let resolve_named = |name: &str| -> MappingResult<SourceRef> {
        named
            .get(name)
            .cloned()
            .ok_or_else(|| ParseError::UnknownSourceRef {
                map: map_name.to_string(),
                name: name.to_string(),
            })
    };

    match value {
        // A bare string references a document-level named source.
        Value::String(name) => Ok(vec![resolve_named(name)?]),
        // A single long-form source.
        Value::Mapping(_) => Ok(vec![parse_source_entry(value)?]),
        Value::Sequence(seq) => {
            let mut sources = Vec::with_capacity(seq.len());
            for item in seq {
                match item {
                    Value::String(name) => sources.push(resolve_named(name)?),
                    Value::Sequence(_) | Value::Mapping(_) => {
                        sources.push(parse_source_entry(item)?)
                    }
                    _ => {
                        return Err(ParseError::InvalidValue {
                            key: format!("mappings.{}.sources", map_name),
                            message: "unrecognized source entry".to_string(),
                        })
                    }
                }
            }
            Ok(sources)
        }
        _ => Err(ParseError::InvalidValue {
            key: format!("mappings.{}.sources", map_name),
            message: "sources must be a name, a mapping, or a list".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

fn parse_targets(value: &Value) -> MappingResult<BTreeMap<String, TargetSpec>> {
    let map = value.as_mapping().ok_or_else(|| ParseError::InvalidValue {
        key: "targets".to_string(),
        message: "must be a mapping of name to target".to_string(),
    })?;
    let mut targets = BTreeMap::new();
    for (k, v) in map {
        let name = k.as_str().ok_or_else(|| ParseError::InvalidValue {
            key: "targets".to_string(),
            message: "target names must be strings".to_string(),
        })?;
        let target = match v {
            // Shortcut: [access~type, serialization?, compression?]
            Value::Sequence(seq) => {
                let access_spec =
                    seq.first()
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| ParseError::InvalidValue {
                            key: "targets".to_string(),
                            message: format!("target '{}' is empty", name),
                        })?;
                let access = access_spec
                    .split_once('~')
                    .map(|(path, _)| path)
                    .unwrap_or(access_spec);
                TargetSpec {
                    access: access.to_string(),
                    serialization: seq.get(1).and_then(|v| v.as_str()).map(|s| s.to_string()),
                }
            }
            Value::Mapping(map) => {
                let field = |key: &str| {
                    map.get(key)
                        .and_then(|v| v.as_str())
                };
                TargetSpec {
                    access: field("access")
                        .ok_or_else(|| ParseError::InvalidValue {
                            key: "targets".to_string(),
                            message: format!("target '{}' requires 'access'", name),
                        })?
                        .to_string(),
                    serialization: field("serialization").map(|s| s.to_string()),
                }
            }
            _ => {
                return Err(ParseError::InvalidValue {
                    key: "targets".to_string(),
                    message: format!("target '{}' must be a list or mapping", name),
                })
            }
        };
        targets.insert(name.to_string(), target);
    }
    Ok(targets)
}

// ---------------------------------------------------------------------------
// Triples maps
// ---------------------------------------------------------------------------

fn parse_triples_map(
    name: &str,
    def: &Value,
    named_sources: &BTreeMap<String, SourceRef>,
) -> MappingResult<TriplesMap> {
    let def = def.as_mapping().ok_or_else(|| ParseError::InvalidValue {
        key: format!("mappings.{}", name),
        message: "map definition must be a mapping".to_string(),
    })?;

    let mut sources = Vec::new();
    let mut subject: Option<SubjectSpec> = None;
    let mut types = Vec::new();
    let mut pairs = Vec::new();
    let mut graph = None;

    for (key, value) in def {
        let key = key.as_str().unwrap_or_default();
        match key {
            "sources" | "source" => {
                sources = parse_mapping_sources(name, value, named_sources)?;
            }
            "subject" | "subjects" => {
                subject = Some(parse_subject(name, value)?);
            }
            "predicateobjects" | "po" => {
                parse_predicate_objects(name, value, &mut types, &mut pairs)?;
            }
            "graphs" | "graph" => {
                graph = Some(parse_graph(name, value)?);
            }
            other => {
                warn!(map = name, key = other, "ignoring unrecognized mapping key");
            }
        }
    }

    let subject = subject.ok_or_else(|| ParseError::MissingSubject(name.to_string()))?;

    let mut tm = TriplesMap::new(name, subject);
    tm.sources = sources;
    tm.types = types;
    tm.pairs = pairs;
    tm.graph = graph;
    Ok(tm)
}

fn parse_graph(map_name: &str, value: &Value) -> MappingResult<Template> {
    let spec = match value {
        Value::String(s) => s.as_str(),
        Value::Sequence(seq) => {
            if seq.len() > 1 {
                warn!(map = map_name, "multiple graphs declared; using the first");
            }
            seq.first()
                .and_then(|v| v.as_str())
                .ok_or_else(|| ParseError::InvalidValue {
                    key: format!("mappings.{}.graphs", map_name),
                    message: "graph entries must be strings".to_string(),
                })?
        }
        _ => {
            return Err(ParseError::InvalidValue {
                key: format!("mappings.{}.graphs", map_name),
                message: "graphs must be a string or list of strings".to_string(),
            })
        }
    };
    Template::parse(spec)
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

fn parse_subject(map_name: &str, value: &Value) -> MappingResult<SubjectSpec> {
    match value {
        Value::String(s) => subject_from_template(s),
        Value::Mapping(_) => parse_subject_item(map_name, value),
        Value::Sequence(seq) => {
            // A quoted-join subject is written as a one-item list holding a
            // `function:` mapping; plain string lists take the first entry.
            for item in seq {
                if item.is_mapping() {
                    return parse_subject_item(map_name, item);
                }
            }
            if seq.len() > 1 {
                warn!(map = map_name, "multiple subjects declared; using the first");
            }
            let first = seq
                .first()
                .and_then(|v| v.as_str())
                .ok_or_else(|| ParseError::MissingSubject(map_name.to_string()))?;
            subject_from_template(first)
        }
        _ => Err(ParseError::MissingSubject(map_name.to_string())),
    }
}

fn subject_from_template(spec: &str) -> MappingResult<SubjectSpec> {
    let spec = strip_iri_marker(spec);
    if let Some(label) = spec.strip_prefix("_:") {
        Ok(SubjectSpec::BlankNode(Template::parse(label)?))
    } else {
        Ok(SubjectSpec::Template(Template::parse(spec)?))
    }
}

fn parse_subject_item(map_name: &str, value: &Value) -> MappingResult<SubjectSpec> {
    let item = value.as_mapping().expect("checked by caller");
    let function = item
        .get("function")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ParseError::MissingSubject(map_name.to_string()))?;

    let mut join = parse_join_function(map_name, function)?;
    if let Some(filter_value) = item.get("filter") {
        join.filter = Some(parse_join_filter(map_name, filter_value)?);
    }
    Ok(SubjectSpec::Quoted(join))
}

/// Parse `join(quoted=<map>, equal(str1=$(own), str2=$(referenced)))`
fn parse_join_function(map_name: &str, function: &str) -> MappingResult<JoinCondition> {
    static QUOTED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"quoted=(\w+)").expect("valid regex"));
    static EQUAL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"equal\(\s*str1=\$\(([^)]+)\)\s*,\s*str2=\$\(([^)]+)\)\s*\)")
            .expect("valid regex")
    });

    let invalid = || ParseError::InvalidJoin {
        map: map_name.to_string(),
        function: function.to_string(),
    };

    let referenced = QUOTED_RE
        .captures(function)
        .and_then(|c| c.get(1))
        .ok_or_else(invalid)?
        .as_str();
    let equal = EQUAL_RE.captures(function).ok_or_else(invalid)?;
    let child_key = Template::parse(format!("$({})", &equal[1]))?;
    let parent_key = Template::parse(format!("$({})", &equal[2]))?;

    Ok(JoinCondition::new(referenced, child_key, parent_key))
}

fn parse_join_filter(map_name: &str, value: &Value) -> MappingResult<JoinFilter> {
    let map = value.as_mapping().ok_or_else(|| ParseError::InvalidValue {
        key: format!("mappings.{}.subject.filter", map_name),
        message: "filter must be a mapping".to_string(),
    })?;

    let mut filter = JoinFilter::default();
    for (k, v) in map {
        match k.as_str().unwrap_or_default() {
            "predicates" | "predicate" => filter.predicates = string_list(v),
            "subjectContains" => {
                filter.subject_contains = v.as_str().map(|s| s.to_string());
            }
            other => {
                // The filter is declared configuration; a typo here must not
                // silently widen the match scope.
                return Err(ParseError::InvalidValue {
                    key: format!("mappings.{}.subject.filter", map_name),
                    message: format!("unknown filter key '{}'", other),
                });
            }
        }
    }
    Ok(filter)
}

// ---------------------------------------------------------------------------
// Predicate-objects
// ---------------------------------------------------------------------------

fn parse_predicate_objects(
    map_name: &str,
    value: &Value,
    types: &mut Vec<String>,
    pairs: &mut Vec<PredicateObjectSpec>,
) -> MappingResult<()> {
    let list = value.as_sequence().ok_or_else(|| ParseError::InvalidValue {
        key: format!("mappings.{}.predicateobjects", map_name),
        message: "predicateobjects must be a list".to_string(),
    })?;

    for item in list {
        match item {
            Value::Sequence(tuple) => parse_po_shorthand(map_name, tuple, types, pairs)?,
            Value::Mapping(_) => parse_po_long(map_name, item, types, pairs)?,
            _ => {
                return Err(ParseError::InvalidValue {
                    key: format!("mappings.{}.predicateobjects", map_name),
                    message: "each entry must be a tuple or a mapping".to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Shorthand tuple: `[p, o]`, `[p, o, datatype]`, `[p, o, lang~lang]`
fn parse_po_shorthand(
    map_name: &str,
    tuple: &[Value],
    types: &mut Vec<String>,
    pairs: &mut Vec<PredicateObjectSpec>,
) -> MappingResult<()> {
    if tuple.len() < 2 {
        return Err(ParseError::InvalidValue {
            key: format!("mappings.{}.predicateobjects", map_name),
            message: "shorthand entry needs at least [predicate, object]".to_string(),
        });
    }

    let predicates = string_list(&tuple[0]);
    let objects = string_list(&tuple[1]);
    let third = tuple.get(2).and_then(|v| v.as_str());

    for predicate in &predicates {
        for object in &objects {
            if predicate == "a" || predicate == "rdf:type" {
                types.push(strip_iri_marker(object).to_string());
                continue;
            }
            let spec = object_from_shorthand(object, third)?;
            pairs.push(PredicateObjectSpec::new(Template::parse(predicate.as_str())?, spec));
        }
    }
    Ok(())
}

fn object_from_shorthand(object: &str, third: Option<&str>) -> MappingResult<ObjectSpec> {
    if let Some(stripped) = object.strip_suffix("~iri") {
        return Ok(ObjectSpec::iri(Template::parse(stripped)?));
    }
    match third {
        // `iri` in the datatype slot marks an IRI object.
        Some("iri") => Ok(ObjectSpec::iri(Template::parse(object)?)),
        Some(lang) if lang.ends_with("~lang") => {
            let tag = lang.trim_end_matches("~lang");
            Ok(ObjectSpec::lang(
                Template::parse(object)?,
                Template::parse(tag)?,
            ))
        }
        Some(datatype) => Ok(ObjectSpec::typed(
            Template::parse(object)?,
            Template::parse(datatype)?,
        )),
        None => Ok(ObjectSpec::literal(Template::parse(object)?)),
    }
}

/// Long form: `predicates:` / `objects:` with optional value/type/datatype/
/// language/quoted keys and a per-pair graph
fn parse_po_long(
    map_name: &str,
    item: &Value,
    types: &mut Vec<String>,
    pairs: &mut Vec<PredicateObjectSpec>,
) -> MappingResult<()> {
    let map = item.as_mapping().expect("checked by caller");
    let get = |key: &str| map.get(key);

    let predicates_value = get("predicates")
        .or_else(|| get("predicate"))
        .ok_or_else(|| ParseError::InvalidValue {
            key: format!("mappings.{}.predicateobjects", map_name),
            message: "long-form entry requires 'predicates'".to_string(),
        })?;
    let predicates = string_list(predicates_value);

    let objects_value = get("objects")
        .or_else(|| get("object"))
        .ok_or_else(|| ParseError::InvalidValue {
            key: format!("mappings.{}.predicateobjects", map_name),
            message: "long-form entry requires 'objects'".to_string(),
        })?;
    let objects: Vec<&Value> = match objects_value {
        Value::Sequence(seq) => seq.iter().collect(),
        other => vec![other],
    };

    let graph = match get("graphs").or_else(|| get("graph")) {
        Some(v) => Some(parse_graph(map_name, v)?),
        None => None,
    };

    for predicate in &predicates {
        for object in &objects {
            if predicate == "a" || predicate == "rdf:type" {
                if let Some(s) = object.as_str() {
                    types.push(strip_iri_marker(s).to_string());
                }
                continue;
            }
            let spec = parse_object_value(map_name, object)?;
            let mut pair = PredicateObjectSpec::new(Template::parse(predicate.as_str())?, spec);
            if let Some(g) = &graph {
                pair = pair.with_graph(g.clone());
            }
            pairs.push(pair);
        }
    }
    Ok(())
}

fn parse_object_value(map_name: &str, value: &Value) -> MappingResult<ObjectSpec> {
    match value {
        Value::String(s) => object_from_shorthand(s, None),
        Value::Mapping(map) => {
            let get = |key: &str| {
                map.get(key)
                    .and_then(|v| v.as_str())
            };

            if let Some(quoted) = get("quoted") {
                return Ok(ObjectSpec::QuotedRef(quoted.to_string()));
            }

            let raw = get("value").ok_or_else(|| ParseError::InvalidValue {
                key: format!("mappings.{}.predicateobjects", map_name),
                message: "long-form object requires 'value' or 'quoted'".to_string(),
            })?;

            let datatype = get("datatype");
            let language = get("language");
            let is_iri = get("type") == Some("iri")
                || raw.ends_with("~iri")
                || datatype == Some("iri");

            if is_iri {
                return Ok(ObjectSpec::iri(Template::parse(strip_iri_marker(raw))?));
            }

            Ok(ObjectSpec::Literal {
                value: Template::parse(raw)?,
                datatype: datatype.map(Template::parse).transpose()?,
                language: language.map(Template::parse).transpose()?,
            })
        }
        // Bare scalars (numbers, booleans) become constant literals.
        other => {
            let rendered = scalar_string(other, "objects")?;
            Ok(ObjectSpec::literal(Template::parse(rendered)?))
        }
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

fn strip_iri_marker(value: &str) -> &str {
    value.strip_suffix("~iri").unwrap_or(value)
}

fn scalar_string(value: &Value, key: &str) -> MappingResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ParseError::InvalidValue {
            key: key.to_string(),
            message: "expected a scalar value".to_string(),
        }),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Sequence(seq) => seq
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceKind;

    const BASIC: &str = r#"
prefixes:
  ex: "http://example.org/"
  dcat: "http://www.w3.org/ns/dcat#"

mappings:
  datasetTM:
    sources:
      - ['data_products.csv~csv']
    subject: ex:dataset/$(dataset_id)
    predicateobjects:
      - [a, dcat:Dataset]
      - [ex:title, $(title)]
      - [ex:issued, $(issued), xsd:date]
      - [dcat:theme, ex:theme/$(theme)~iri]
"#;

    #[test]
    fn test_parse_basic_mapping() {
        let model = parse_str(BASIC).unwrap();
        assert_eq!(model.len(), 1);

        let tm = model.get("datasetTM").unwrap();
        assert!(!tm.is_annotation());
        assert_eq!(tm.sources.len(), 1);
        assert_eq!(tm.sources[0].access, "data_products.csv");
        assert_eq!(tm.sources[0].kind, SourceKind::Csv);
        assert_eq!(tm.types, vec!["dcat:Dataset"]);
        assert_eq!(tm.pairs.len(), 3);

        match &tm.pairs[1].object {
            ObjectSpec::Literal { datatype, .. } => {
                assert_eq!(datatype.as_ref().unwrap().source(), "xsd:date");
            }
            other => panic!("expected typed literal, got {:?}", other),
        }
        assert!(matches!(tm.pairs[2].object, ObjectSpec::Iri(_)));
    }

    #[test]
    fn test_default_prefixes_injected() {
        let model = parse_str(BASIC).unwrap();
        assert!(model.prefixes.contains("rdf"));
        assert!(model.prefixes.contains("rdfs"));
        assert!(model.prefixes.contains("xsd"));
        assert_eq!(model.prefixes.get("ex"), Some("http://example.org/"));
    }

    #[test]
    fn test_unknown_top_level_key_fails() {
        let err = parse_str("bogus: 1\nmappings: {}\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownKey(k) if k == "bogus"));
    }

    #[test]
    fn test_missing_subject_fails() {
        let doc = r#"
mappings:
  broken:
    sources:
      - ['x.csv~csv']
    predicateobjects:
      - [a, ex:Thing]
"#;
        let err = parse_str(doc).unwrap_err();
        assert!(matches!(err, ParseError::MissingSubject(m) if m == "broken"));
    }

    #[test]
    fn test_malformed_template_fails() {
        let doc = r#"
mappings:
  broken:
    sources:
      - ['x.csv~csv']
    subject: ex:item/$(id
"#;
        let err = parse_str(doc).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_quoted_subject_with_filter() {
        let doc = r#"
prefixes:
  ex: "http://example.org/"
mappings:
  qualityTM:
    sources:
      - ['quality.csv~csv']
    subject:
      - function: join(quoted=datasetTM, equal(str1=$(dataset_id), str2=$(dataset_id)))
        filter:
          predicates: [ex:theme]
          subjectContains: /dataset/
    predicateobjects:
      - [ex:score, $(score), xsd:decimal]
"#;
        let model = parse_str(doc).unwrap();
        let tm = model.get("qualityTM").unwrap();
        assert!(tm.is_annotation());

        let join = tm.join().unwrap();
        assert_eq!(join.referenced_map, "datasetTM");
        assert_eq!(join.child_key.source(), "$(dataset_id)");
        assert_eq!(join.parent_key.source(), "$(dataset_id)");

        let filter = join.filter.as_ref().unwrap();
        assert_eq!(filter.predicates, vec!["ex:theme"]);
        assert_eq!(filter.subject_contains.as_deref(), Some("/dataset/"));
    }

    #[test]
    fn test_malformed_join_fails() {
        let doc = r#"
mappings:
  qualityTM:
    sources:
      - ['quality.csv~csv']
    subject:
      - function: join(nonsense)
    predicateobjects:
      - [ex:score, $(score)]
"#;
        let err = parse_str(doc).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJoin { .. }));
    }

    #[test]
    fn test_unknown_filter_key_fails() {
        let doc = r#"
mappings:
  qualityTM:
    sources:
      - ['quality.csv~csv']
    subject:
      - function: join(quoted=datasetTM, equal(str1=$(id), str2=$(id)))
        filter:
          subjectMatches: oops
    predicateobjects:
      - [ex:score, $(score)]
"#;
        let err = parse_str(doc).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_long_form_cartesian_expansion() {
        let doc = r#"
prefixes:
  foaf: "http://xmlns.com/foaf/0.1/"
mappings:
  personTM:
    sources:
      - ['person.csv~csv']
    subjects: ex:person/$(id)
    predicateobjects:
      - predicates: [foaf:name, rdfs:label]
        objects:
          - value: $(name)
            language: en
          - value: $(nickname)
"#;
        let model = parse_str(doc).unwrap();
        let tm = model.get("personTM").unwrap();
        // 2 predicates x 2 objects
        assert_eq!(tm.pairs.len(), 4);
        assert!(matches!(
            &tm.pairs[0].object,
            ObjectSpec::Literal { language: Some(l), .. } if l.source() == "en"
        ));
    }

    #[test]
    fn test_named_source_reference() {
        let doc = r#"
sources:
  products: ['data_products.csv~csv']
  people:
    access: people.json
    referenceFormulation: jsonpath
    iterator: $
mappings:
  productTM:
    sources: products
    subject: ex:product/$(id)
    predicateobjects:
      - [ex:name, $(name)]
  personTM:
    sources:
      - people
    subject: ex:person/$(id)
    predicateobjects:
      - [ex:name, $(name)]
"#;
        let model = parse_str(doc).unwrap();
        assert_eq!(
            model.get("productTM").unwrap().sources[0].access,
            "data_products.csv"
        );
        let person_src = &model.get("personTM").unwrap().sources[0];
        assert_eq!(person_src.access, "people.json");
        assert_eq!(person_src.kind, SourceKind::Json);
        assert_eq!(person_src.iterator.as_deref(), Some("$"));
    }

    #[test]
    fn test_unknown_named_source_fails() {
        let doc = r#"
mappings:
  productTM:
    sources: nonexistent
    subject: ex:product/$(id)
    predicateobjects:
      - [ex:name, $(name)]
"#;
        let err = parse_str(doc).unwrap_err();
        assert!(matches!(err, ParseError::UnknownSourceRef { name, .. } if name == "nonexistent"));
    }

    #[test]
    fn test_multiple_sources() {
        let doc = r#"
mappings:
  productTM:
    sources:
      - ['a.csv~csv']
      - ['b.csv~csv']
    subject: ex:product/$(id)
    predicateobjects:
      - [ex:name, $(name)]
"#;
        let model = parse_str(doc).unwrap();
        assert_eq!(model.get("productTM").unwrap().sources.len(), 2);
    }

    #[test]
    fn test_blank_node_subject() {
        let doc = r#"
mappings:
  rowTM:
    sources:
      - ['rows.csv~csv']
    subject: _:row_$(id)
    predicateobjects:
      - [ex:value, $(value)]
"#;
        let model = parse_str(doc).unwrap();
        match &model.get("rowTM").unwrap().subject {
            SubjectSpec::BlankNode(t) => assert_eq!(t.source(), "row_$(id)"),
            other => panic!("expected blank node subject, got {:?}", other),
        }
    }

    #[test]
    fn test_base_authors_targets() {
        let doc = r#"
base: http://example.org/base#
authors:
  - John Doe <john@doe.com>
  - Jane Doe (https://janedoe.com)
  - http://johndoe.com/#me
  - name: Explicit Author
    email: explicit@example.com
targets:
  default: ['output/result.trig~file', 'trig']
  named:
    access: output/other.ttl
    serialization: turtle
mappings:
  itemTM:
    sources:
      - ['items.csv~csv']
    subject: ex:item/$(id)
    predicateobjects:
      - [ex:name, $(name)]
"#;
        let model = parse_str(doc).unwrap();
        assert_eq!(model.base.as_deref(), Some("http://example.org/base#"));

        assert_eq!(model.authors.len(), 4);
        assert_eq!(model.authors[0].name.as_deref(), Some("John Doe"));
        assert_eq!(model.authors[0].email.as_deref(), Some("john@doe.com"));
        assert_eq!(model.authors[1].website.as_deref(), Some("https://janedoe.com"));
        assert_eq!(model.authors[2].webid.as_deref(), Some("http://johndoe.com/#me"));
        assert_eq!(model.authors[3].name.as_deref(), Some("Explicit Author"));

        assert_eq!(model.targets["default"].access, "output/result.trig");
        assert_eq!(model.targets["default"].serialization.as_deref(), Some("trig"));
        assert_eq!(model.targets["named"].serialization.as_deref(), Some("turtle"));
    }

    #[test]
    fn test_quoted_object_reference() {
        let doc = r#"
mappings:
  linkTM:
    sources:
      - ['links.csv~csv']
    subject: ex:link/$(id)
    predicateobjects:
      - predicates: ex:about
        objects:
          quoted: datasetTM
"#;
        let model = parse_str(doc).unwrap();
        let tm = model.get("linkTM").unwrap();
        assert_eq!(tm.pairs[0].object.quoted_ref(), Some("datasetTM"));
    }

    #[test]
    fn test_per_pair_graph() {
        let doc = r#"
mappings:
  itemTM:
    sources:
      - ['items.csv~csv']
    subject: ex:item/$(id)
    graphs: ex:ItemGraph
    predicateobjects:
      - predicates: ex:name
        objects: $(name)
        graph: ex:NameGraph
"#;
        let model = parse_str(doc).unwrap();
        let tm = model.get("itemTM").unwrap();
        assert_eq!(tm.graph.as_ref().unwrap().source(), "ex:ItemGraph");
        assert_eq!(tm.pairs[0].graph.as_ref().unwrap().source(), "ex:NameGraph");
    }
}
