use super::context::{ActiveContext, Container, RemoteContexts, TypeMapping};
use super::error::{JsonLdError, Result};
use super::iri;
use serde_json::{json, Map, Value};

/// Expand a document into an array of node objects
pub fn document(doc: &Value, active: &ActiveContext, remote: &RemoteContexts) -> Result<Vec<Value>> {
    let nodes = match element(active, None, doc, remote)? {
        None => vec![],
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut map)) => {
            if map.len() == 1 && map.contains_key("@graph") {
                into_items(map.remove("@graph"))
            } else {
                vec![Value::Object(map)]
            }
        }
        Some(other) => vec![other],
    };

    Ok(nodes)
}

fn into_items(value: Option<Value>) -> Vec<Value> {
    match value {
        None => vec![],
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

/// Expand any JSON value appearing under `property`
fn element(
    active: &ActiveContext,
    property: Option<&str>,
    value: &Value,
    remote: &RemoteContexts,
) -> Result<Option<Value>> {
    match value {
        Value::Null => Ok(None),

        Value::Array(items) => {
            let mut expanded = Vec::with_capacity(items.len());
            for item in items {
                match element(active, property, item, remote)? {
                    Some(Value::Array(nested)) => expanded.extend(nested),
                    Some(v) => expanded.push(v),
                    None => {}
                }
            }
            Ok(Some(Value::Array(expanded)))
        }

        Value::Object(map) => object(active, property, map, remote),

        scalar => match property {
            None | Some("@graph") => Ok(None),
            Some(p) => Ok(Some(value_object(active, p, scalar))),
        },
    }
}

fn object(
    active: &ActiveContext,
    property: Option<&str>,
    map: &Map<String, Value>,
    remote: &RemoteContexts,
) -> Result<Option<Value>> {
    let processed;
    let active = match map.get("@context") {
        Some(local) => {
            processed = active.process(local, remote)?;
            &processed
        }
        None => active,
    };

    let mut result = Map::new();

    for (key, value) in map {
        if key == "@context" {
            continue;
        }
        let Some(expanded) = active.expand_iri(key, true, false) else {
            continue;
        };

        if expanded.starts_with('@') {
            keyword(active, property, &expanded, value, &mut result, remote)?;
            continue;
        }
        if !iri::is_absolute(&expanded) && !iri::is_blank_node(&expanded) {
            continue;
        }

        let definition = active.term(key);
        let container = definition.and_then(|d| d.container);

        let values = if container == Some(Container::Language) && value.is_object() {
            language_map(value)
        } else if container == Some(Container::Index) && value.is_object() {
            index_map(active, key, value, remote)?
        } else {
            match element(active, Some(key), value, remote)? {
                None => continue,
                Some(Value::Array(items)) => items,
                Some(v) => vec![v],
            }
        };

        let values = if container == Some(Container::List) && !is_list_object(&values) {
            vec![json!({ "@list": values })]
        } else {
            values
        };

        if definition.is_some_and(|d| d.reverse) {
            let reverse = result
                .entry("@reverse")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(reverse) = reverse {
                append(reverse, expanded, values);
            }
        } else {
            append(&mut result, expanded, values);
        }
    }

    finish(property, result)
}

fn keyword(
    active: &ActiveContext,
    property: Option<&str>,
    keyword: &str,
    value: &Value,
    result: &mut Map<String, Value>,
    remote: &RemoteContexts,
) -> Result<()> {
    match keyword {
        "@id" => {
            if let Value::String(id) = value {
                let expanded = active
                    .expand_iri(id, false, true)
                    .unwrap_or_else(|| id.clone());
                result.insert("@id".to_string(), Value::String(expanded));
            }
        }
        "@type" => {
            let types: Vec<Value> = match value {
                Value::String(t) => vec![t.as_str()],
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => vec![],
            }
            .into_iter()
            .filter_map(|t| active.expand_iri(t, true, true))
            .map(Value::String)
            .collect();
            result.insert("@type".to_string(), Value::Array(types));
        }
        "@value" | "@index" => {
            result.insert(keyword.to_string(), value.clone());
        }
        "@language" => {
            if let Some(language) = value.as_str() {
                result.insert(
                    "@language".to_string(),
                    Value::String(language.to_lowercase()),
                );
            }
        }
        "@list" | "@set" => {
            let items = into_items(element(active, property, value, remote)?);
            result.insert(keyword.to_string(), Value::Array(items));
        }
        "@graph" => {
            let items = into_items(element(active, Some("@graph"), value, remote)?);
            result.insert("@graph".to_string(), Value::Array(items));
        }
        _ => {}
    }

    Ok(())
}

fn finish(property: Option<&str>, mut result: Map<String, Value>) -> Result<Option<Value>> {
    let top_level = matches!(property, None | Some("@graph"));

    if let Some(value) = result.get("@value") {
        if value.is_null() || top_level {
            return Ok(None);
        }
        if value.is_object() || value.is_array() {
            return Err(JsonLdError::InvalidValueObject {
                value: Value::Object(result),
            });
        }
        if let Some(Value::Array(types)) = result.get_mut("@type") {
            if types.len() == 1 {
                let datatype = types.remove(0);
                result.insert("@type".to_string(), datatype);
            }
        }
        return Ok(Some(Value::Object(result)));
    }

    if let Some(set) = result.remove("@set") {
        return Ok(Some(set));
    }

    if result.len() == 1 && result.contains_key("@language") {
        return Ok(None);
    }

    if top_level
        && (result.is_empty()
            || result.contains_key("@list")
            || (result.len() == 1 && result.contains_key("@id")))
    {
        return Ok(None);
    }

    Ok(Some(Value::Object(result)))
}

/// Expand a scalar according to the term's type coercion and language
fn value_object(active: &ActiveContext, property: &str, scalar: &Value) -> Value {
    let definition = active.term(property);

    match (definition.and_then(|d| d.type_mapping.as_ref()), scalar) {
        (Some(TypeMapping::Id), Value::String(s)) => {
            json!({ "@id": active.expand_iri(s, false, true).unwrap_or_else(|| s.clone()) })
        }
        (Some(TypeMapping::Vocab), Value::String(s)) => {
            json!({ "@id": active.expand_iri(s, true, true).unwrap_or_else(|| s.clone()) })
        }
        (Some(TypeMapping::Datatype(datatype)), _) => {
            json!({ "@value": scalar, "@type": datatype })
        }
        (_, Value::String(_)) => {
            let language = definition
                .and_then(|d| d.language.clone())
                .unwrap_or_else(|| active.language.clone());
            match language {
                Some(language) => json!({ "@value": scalar, "@language": language }),
                None => json!({ "@value": scalar }),
            }
        }
        _ => json!({ "@value": scalar }),
    }
}

fn language_map(value: &Value) -> Vec<Value> {
    let Value::Object(map) = value else {
        return vec![];
    };

    let mut values = Vec::new();
    for (language, texts) in map {
        let texts = match texts {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for text in texts.into_iter().filter_map(Value::as_str) {
            values.push(json!({ "@value": text, "@language": language.to_lowercase() }));
        }
    }
    values
}

/// Expand every entry of an index map, tagging each result with its key
fn index_map(
    active: &ActiveContext,
    property: &str,
    value: &Value,
    remote: &RemoteContexts,
) -> Result<Vec<Value>> {
    let Value::Object(map) = value else {
        return Ok(vec![]);
    };

    let mut values = Vec::new();
    for (index, item) in map {
        for mut expanded in into_items(element(active, Some(property), item, remote)?) {
            if let Value::Object(object) = &mut expanded {
                object
                    .entry("@index")
                    .or_insert_with(|| Value::String(index.clone()));
            }
            values.push(expanded);
        }
    }
    Ok(values)
}

fn is_list_object(values: &[Value]) -> bool {
    values.len() == 1 && values[0].get("@list").is_some()
}

fn append(map: &mut Map<String, Value>, key: String, values: Vec<Value>) {
    let entry = map
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(existing) = entry {
        existing.extend(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(doc: Value, base: &str) -> Vec<Value> {
        document(&doc, &ActiveContext::new(Some(base)), &RemoteContexts::new()).unwrap()
    }

    #[test]
    fn test_expand_hydra_class() {
        let nodes = expand(
            json!({
                "@context": {
                    "@vocab": "http://localhost/docs.jsonld#",
                    "hydra": "http://www.w3.org/ns/hydra/core#",
                    "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
                    "range": {"@id": "rdfs:range", "@type": "@id"}
                },
                "@id": "#Book",
                "@type": "hydra:Class",
                "hydra:title": "Book",
                "hydra:supportedProperty": [{
                    "hydra:property": {"@id": "#Book/isbn", "range": "xsd:string"},
                    "hydra:readable": true
                }]
            }),
            "http://localhost/docs.jsonld",
        );

        assert_eq!(nodes.len(), 1);
        let class = &nodes[0];
        assert_eq!(class["@id"], "http://localhost/docs.jsonld#Book");
        assert_eq!(class["@type"], json!(["http://www.w3.org/ns/hydra/core#Class"]));
        assert_eq!(
            class["http://www.w3.org/ns/hydra/core#title"],
            json!([{"@value": "Book"}])
        );

        let supported = &class["http://www.w3.org/ns/hydra/core#supportedProperty"][0];
        assert_eq!(
            supported["http://www.w3.org/ns/hydra/core#readable"],
            json!([{"@value": true}])
        );
        let property = &supported["http://www.w3.org/ns/hydra/core#property"][0];
        assert_eq!(property["@id"], "http://localhost/docs.jsonld#Book/isbn");
        assert_eq!(
            property["http://www.w3.org/2000/01/rdf-schema#range"],
            json!([{"@id": "xsd:string"}])
        );
    }

    #[test]
    fn test_expand_drops_unmapped_properties() {
        let nodes = expand(
            json!({
                "@context": {"name": "http://schema.org/name"},
                "@id": "/1",
                "name": "Dune",
                "unknown": "dropped"
            }),
            "http://localhost/",
        );

        let node = nodes[0].as_object().unwrap();
        assert_eq!(node.len(), 2);
        assert_eq!(node["@id"], "http://localhost/1");
        assert_eq!(node["http://schema.org/name"], json!([{"@value": "Dune"}]));
    }

    #[test]
    fn test_expand_graph_and_free_floating_values() {
        let nodes = expand(
            json!({
                "@context": {"@vocab": "http://example.org/"},
                "@graph": [
                    {"@id": "http://example.org/a", "name": "A"},
                    {"@id": "http://example.org/b"},
                    {"@value": "floating"}
                ]
            }),
            "http://example.org/",
        );

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["@id"], "http://example.org/a");
    }

    #[test]
    fn test_expand_list_container_and_typed_literal() {
        let nodes = expand(
            json!({
                "@context": {
                    "xsd": "http://www.w3.org/2001/XMLSchema#",
                    "tags": {"@id": "http://example.org/tags", "@container": "@list"},
                    "count": {"@id": "http://example.org/count", "@type": "xsd:integer"}
                },
                "@id": "http://example.org/x",
                "tags": ["a", "b"],
                "count": 3
            }),
            "http://example.org/",
        );

        let node = &nodes[0];
        assert_eq!(
            node["http://example.org/tags"],
            json!([{"@list": [{"@value": "a"}, {"@value": "b"}]}])
        );
        assert_eq!(
            node["http://example.org/count"],
            json!([{"@value": 3, "@type": "http://www.w3.org/2001/XMLSchema#integer"}])
        );
    }

    #[test]
    fn test_expand_language() {
        let nodes = expand(
            json!({
                "@context": {
                    "@language": "EN",
                    "label": "http://www.w3.org/2000/01/rdf-schema#label",
                    "title": {"@id": "http://purl.org/dc/terms/title", "@container": "@language"}
                },
                "@id": "http://example.org/x",
                "label": "Book",
                "title": {"fr": "Livre"}
            }),
            "http://example.org/",
        );

        let node = &nodes[0];
        assert_eq!(
            node["http://www.w3.org/2000/01/rdf-schema#label"],
            json!([{"@value": "Book", "@language": "en"}])
        );
        assert_eq!(
            node["http://purl.org/dc/terms/title"],
            json!([{"@value": "Livre", "@language": "fr"}])
        );
    }

    #[test]
    fn test_expand_index_container() {
        let nodes = expand(
            json!({
                "@context": {
                    "@vocab": "http://example.org/",
                    "editions": {"@id": "http://example.org/editions", "@container": "@index"}
                },
                "@id": "http://example.org/x",
                "editions": {
                    "en": "Dune",
                    "fr": [{"@id": "/dune-fr", "title": "Dune (fr)"}],
                    "de": {"@value": "Der Wüstenplanet", "@index": "german"}
                }
            }),
            "http://example.org/",
        );

        assert_eq!(
            nodes[0]["http://example.org/editions"],
            json!([
                {"@value": "Der Wüstenplanet", "@index": "german"},
                {"@value": "Dune", "@index": "en"},
                {
                    "@id": "http://example.org/dune-fr",
                    "http://example.org/title": [{"@value": "Dune (fr)"}],
                    "@index": "fr"
                }
            ])
        );
    }

    #[test]
    fn test_keyword_aliases_and_set() {
        let nodes = expand(
            json!({
                "@context": {"id": "@id", "type": "@type", "@vocab": "http://example.org/"},
                "id": "http://example.org/x",
                "type": "Thing",
                "items": {"@set": ["a"]}
            }),
            "http://example.org/",
        );

        let node = &nodes[0];
        assert_eq!(node["@id"], "http://example.org/x");
        assert_eq!(node["@type"], json!(["http://example.org/Thing"]));
        assert_eq!(node["http://example.org/items"], json!([{"@value": "a"}]));
    }

    #[test]
    fn test_invalid_value_object() {
        let result = document(
            &json!({"http://example.org/p": {"@value": {"nested": true}}, "@id": "x"}),
            &ActiveContext::new(None),
            &RemoteContexts::new(),
        );
        assert!(matches!(result, Err(JsonLdError::InvalidValueObject { .. })));
    }
}
