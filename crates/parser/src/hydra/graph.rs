//! Typed view of an expanded JSON-LD document
//!
//! Expansion yields loosely structured JSON. It is converted once into
//! [`ExpandedGraph`] so that the Hydra walker reads predicates through named
//! accessors instead of indexing raw maps.

use api_doc_parser_common::{ParseError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// A literal (`{"@value": ...}`)
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub value: Value,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl ValueNode {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Booleans, also accepting the `"true"`/`"false"` lexical forms
    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        }
    }
}

/// Object of a predicate: a node (possibly just a reference) or a literal
#[derive(Debug, Clone, PartialEq)]
pub enum GraphTerm {
    Node(GraphNode),
    Value(ValueNode),
}

/// A node object of an expanded document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphNode {
    id: Option<String>,
    types: Vec<String>,
    properties: BTreeMap<String, Vec<GraphTerm>>,
}

impl GraphNode {
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            ParseError::MalformedDocument(format!("expected a node object, got {}", value))
        })?;

        let mut node = GraphNode {
            id: map.get("@id").and_then(Value::as_str).map(str::to_string),
            types: map
                .get("@type")
                .and_then(Value::as_array)
                .map(|types| {
                    types
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            properties: BTreeMap::new(),
        };

        for (predicate, objects) in map {
            if predicate.starts_with('@') {
                continue;
            }
            let mut terms = Vec::new();
            for object in objects.as_array().into_iter().flatten() {
                push_terms(object, &mut terms)?;
            }
            node.properties.insert(predicate.clone(), terms);
        }

        Ok(node)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn first_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    pub fn has_type(&self, iri: &str) -> bool {
        self.types.iter().any(|t| t == iri)
    }

    /// Whether the predicate is present, even with no objects
    pub fn has(&self, predicate: &str) -> bool {
        self.properties.contains_key(predicate)
    }

    pub fn values(&self, predicate: &str) -> &[GraphTerm] {
        self.properties
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Node objects of a predicate, skipping literals
    pub fn nodes<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.values(predicate).iter().filter_map(|term| match term {
            GraphTerm::Node(node) => Some(node),
            GraphTerm::Value(_) => None,
        })
    }

    pub fn first_node(&self, predicate: &str) -> Option<&GraphNode> {
        self.nodes(predicate).next()
    }

    pub fn first_value(&self, predicate: &str) -> Option<&ValueNode> {
        self.values(predicate).iter().find_map(|term| match term {
            GraphTerm::Value(value) => Some(value),
            GraphTerm::Node(_) => None,
        })
    }

    /// First string literal of a predicate
    pub fn string(&self, predicate: &str) -> Option<&str> {
        self.first_value(predicate).and_then(ValueNode::as_str)
    }

    /// First boolean literal of a predicate
    pub fn boolean(&self, predicate: &str) -> Option<bool> {
        self.first_value(predicate).and_then(ValueNode::as_bool)
    }

    /// First IRI of a predicate: a node identifier, or a string literal when
    /// the context did not coerce the predicate to `@id`
    pub fn first_iri(&self, predicate: &str) -> Option<&str> {
        self.values(predicate).iter().find_map(|term| match term {
            GraphTerm::Node(node) => node.id(),
            GraphTerm::Value(value) => value.as_str(),
        })
    }
}

fn push_terms(object: &Value, terms: &mut Vec<GraphTerm>) -> Result<()> {
    let Some(map) = object.as_object() else {
        return Err(ParseError::MalformedDocument(format!(
            "expected an expanded object, got {}",
            object
        )));
    };

    if let Some(list) = map.get("@list") {
        for item in list.as_array().into_iter().flatten() {
            push_terms(item, terms)?;
        }
    } else if let Some(value) = map.get("@value") {
        terms.push(GraphTerm::Value(ValueNode {
            value: value.clone(),
            datatype: map.get("@type").and_then(Value::as_str).map(str::to_string),
            language: map
                .get("@language")
                .and_then(Value::as_str)
                .map(str::to_string),
        }));
    } else {
        terms.push(GraphTerm::Node(GraphNode::from_json(object)?));
    }

    Ok(())
}

/// An expanded document: its top-level node objects in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedGraph {
    nodes: Vec<GraphNode>,
}

impl ExpandedGraph {
    pub fn from_nodes(nodes: &[Value]) -> Result<Self> {
        Ok(Self {
            nodes: nodes
                .iter()
                .map(GraphNode::from_json)
                .collect::<Result<_>>()?,
        })
    }

    /// First top-level node (the documentation or entrypoint itself)
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
