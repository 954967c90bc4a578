//! Hydra vocabulary views over an expanded documentation graph
//!
//! Each view borrows a [`GraphNode`] and exposes the handful of predicates
//! the parser needs. A `hydra:supportedProperty` wrapper and the
//! `hydra:property` it wraps are distinct nodes: the same property may be
//! reused by several wrappers with different flags.

use super::graph::{ExpandedGraph, GraphNode};
use super::vocab;
use api_doc_parser_common::{ParseError, Result};

/// Root node of the API documentation
#[derive(Debug, Clone, Copy)]
pub struct Documentation<'a> {
    node: &'a GraphNode,
}

impl<'a> Documentation<'a> {
    pub fn from_graph(graph: &'a ExpandedGraph) -> Result<Self> {
        graph
            .root()
            .map(|node| Self { node })
            .ok_or_else(|| ParseError::MalformedDocument("the documentation is empty".to_string()))
    }

    pub fn title(&self) -> Option<&'a str> {
        self.node.string(vocab::TITLE)
    }

    pub fn supported_classes(&self) -> Result<Vec<SupportedClass<'a>>> {
        if !self.node.has(vocab::SUPPORTED_CLASS) {
            return Err(ParseError::MalformedDocument(
                "the documentation declares no hydra:supportedClass".to_string(),
            ));
        }

        Ok(self
            .node
            .nodes(vocab::SUPPORTED_CLASS)
            .map(|node| SupportedClass { node })
            .collect())
    }

    /// Find the description of the class with the given IRI
    ///
    /// A miss is fatal: the class is referenced but never described.
    pub fn find_supported_class(&self, class_id: &str) -> Result<SupportedClass<'a>> {
        self.supported_classes()?
            .into_iter()
            .find(|class| class.id() == Some(class_id))
            .ok_or_else(|| ParseError::ClassNotFound {
                class_id: class_id.to_string(),
            })
    }
}

/// A `hydra:supportedClass` entry
#[derive(Debug, Clone, Copy)]
pub struct SupportedClass<'a> {
    node: &'a GraphNode,
}

impl<'a> SupportedClass<'a> {
    pub fn node(&self) -> &'a GraphNode {
        self.node
    }

    pub fn id(&self) -> Option<&'a str> {
        self.node.id()
    }

    pub fn title(&self) -> Result<&'a str> {
        self.node.string(vocab::TITLE).ok_or_else(|| {
            ParseError::MalformedDocument(format!(
                "the class {} has no hydra:title",
                self.id().unwrap_or("<anonymous>")
            ))
        })
    }

    pub fn supported_properties(&self) -> impl Iterator<Item = SupportedProperty<'a>> + 'a {
        self.node
            .nodes(vocab::SUPPORTED_PROPERTY)
            .map(|node| SupportedProperty { node })
    }
}

/// A `hydra:supportedProperty` wrapper
#[derive(Debug, Clone, Copy)]
pub struct SupportedProperty<'a> {
    node: &'a GraphNode,
}

impl<'a> SupportedProperty<'a> {
    pub fn property(&self) -> Result<Property<'a>> {
        self.node
            .first_node(vocab::PROPERTY)
            .map(|node| Property { node })
            .ok_or_else(|| {
                ParseError::MalformedDocument(
                    "a hydra:supportedProperty has no hydra:property".to_string(),
                )
            })
    }

    pub fn required(&self) -> bool {
        self.node.boolean(vocab::REQUIRED).unwrap_or(false)
    }

    /// `hydra:readable`, which every supported property must declare
    pub fn readable(&self) -> Result<bool> {
        self.flag(vocab::READABLE, "hydra:readable")
    }

    /// `hydra:writable`, which every supported property must declare
    pub fn writable(&self) -> Result<bool> {
        self.flag(vocab::WRITABLE, "hydra:writable")
    }

    pub fn description(&self) -> &'a str {
        self.node.string(vocab::DESCRIPTION).unwrap_or_default()
    }

    fn flag(&self, predicate: &str, name: &str) -> Result<bool> {
        self.node.boolean(predicate).ok_or_else(|| {
            let property = self
                .node
                .first_node(vocab::PROPERTY)
                .and_then(GraphNode::id)
                .unwrap_or("<anonymous>");
            ParseError::MalformedDocument(format!(
                "the supported property {} has no boolean {}",
                property, name
            ))
        })
    }
}

/// The property wrapped by a supported property
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
    node: &'a GraphNode,
}

impl<'a> Property<'a> {
    pub fn id(&self) -> Result<&'a str> {
        self.node.id().ok_or_else(|| {
            ParseError::MalformedDocument("a hydra:property has no @id".to_string())
        })
    }

    pub fn label(&self) -> Result<&'a str> {
        self.node.string(vocab::RDFS_LABEL).ok_or_else(|| {
            ParseError::MalformedDocument(format!(
                "the property {} has no rdfs:label",
                self.node.id().unwrap_or("<anonymous>")
            ))
        })
    }

    pub fn types(&self) -> &'a [String] {
        self.node.types()
    }

    pub fn range(&self) -> Option<&'a str> {
        self.node.first_iri(vocab::RDFS_RANGE)
    }

    /// Whether values of this property are links to other resources
    pub fn is_link(&self) -> bool {
        self.node.has_type(vocab::LINK)
    }

    pub fn supported_operations(&self) -> impl Iterator<Item = Operation<'a>> + 'a {
        self.node
            .nodes(vocab::SUPPORTED_OPERATION)
            .map(|node| Operation { node })
    }
}

/// A `hydra:supportedOperation`
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    node: &'a GraphNode,
}

impl<'a> Operation<'a> {
    pub fn returns(&self) -> Option<&'a str> {
        self.node.first_iri(vocab::RETURNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn docs(classes: Value) -> ExpandedGraph {
        ExpandedGraph::from_nodes(&[json!({
            "@id": "http://localhost/docs.jsonld",
            "http://www.w3.org/ns/hydra/core#title": [{"@value": "Library"}],
            "http://www.w3.org/ns/hydra/core#supportedClass": classes
        })])
        .unwrap()
    }

    fn class(id: &str) -> Value {
        json!({
            "@id": id,
            "http://www.w3.org/ns/hydra/core#title": [{"@value": id.rsplit('#').next()}]
        })
    }

    #[test]
    fn test_find_supported_class() {
        let graph = docs(json!([
            class("http://localhost/docs.jsonld#A"),
            class("http://localhost/docs.jsonld#B")
        ]));
        let documentation = Documentation::from_graph(&graph).unwrap();

        assert_eq!(documentation.title(), Some("Library"));

        let b = documentation
            .find_supported_class("http://localhost/docs.jsonld#B")
            .unwrap();
        assert_eq!(b.id(), Some("http://localhost/docs.jsonld#B"));
        assert_eq!(b.title().unwrap(), "B");
        assert!(std::ptr::eq(
            b.node(),
            graph.root().unwrap().nodes(vocab::SUPPORTED_CLASS).nth(1).unwrap()
        ));

        for missing in ["http://localhost/docs.jsonld#C", "A", ""] {
            match documentation.find_supported_class(missing) {
                Err(ParseError::ClassNotFound { class_id }) => assert_eq!(class_id, missing),
                other => panic!("unexpected result: {:?}", other.map(|c| c.id())),
            }
        }
    }

    #[test]
    fn test_documentation_without_classes() {
        let graph = ExpandedGraph::from_nodes(&[json!({"@id": "http://localhost/docs.jsonld"})])
            .unwrap();
        let documentation = Documentation::from_graph(&graph).unwrap();

        assert_eq!(documentation.title(), None);
        assert!(matches!(
            documentation.find_supported_class("http://localhost/docs.jsonld#A"),
            Err(ParseError::MalformedDocument(_))
        ));
        assert!(Documentation::from_graph(&ExpandedGraph::default()).is_err());
    }

    #[test]
    fn test_supported_property_flags() {
        let graph = ExpandedGraph::from_nodes(&[json!({
            "@id": "http://localhost/docs.jsonld#Book",
            "http://www.w3.org/ns/hydra/core#supportedProperty": [
                {
                    "http://www.w3.org/ns/hydra/core#property": [{
                        "@id": "http://schema.org/author",
                        "@type": ["http://www.w3.org/ns/hydra/core#Link"],
                        "http://www.w3.org/2000/01/rdf-schema#label": [{"@value": "author"}],
                        "http://www.w3.org/2000/01/rdf-schema#range": [{"@id": "http://localhost/docs.jsonld#Person"}]
                    }],
                    "http://www.w3.org/ns/hydra/core#required": [{"@value": true}],
                    "http://www.w3.org/ns/hydra/core#readable": [{"@value": true}],
                    "http://www.w3.org/ns/hydra/core#writable": [{"@value": false}],
                    "http://www.w3.org/ns/hydra/core#description": [{"@value": "The author"}]
                },
                {
                    "http://www.w3.org/ns/hydra/core#property": [{"@id": "http://schema.org/name"}],
                    "http://www.w3.org/ns/hydra/core#writable": [{"@value": true}]
                }
            ]
        })])
        .unwrap();

        let class = SupportedClass {
            node: graph.root().unwrap(),
        };
        let properties: Vec<_> = class.supported_properties().collect();
        assert_eq!(properties.len(), 2);

        let author = properties[0];
        assert!(author.required());
        assert!(author.readable().unwrap());
        assert!(!author.writable().unwrap());
        assert_eq!(author.description(), "The author");
        let property = author.property().unwrap();
        assert_eq!(property.id().unwrap(), "http://schema.org/author");
        assert_eq!(property.label().unwrap(), "author");
        assert_eq!(property.range(), Some("http://localhost/docs.jsonld#Person"));
        assert!(property.is_link());
        assert_eq!(property.types(), ["http://www.w3.org/ns/hydra/core#Link"]);

        let name = properties[1];
        assert!(!name.required());
        assert_eq!(name.description(), "");
        assert!(matches!(name.readable(), Err(ParseError::MalformedDocument(_))));
        assert!(name.writable().unwrap());
        assert!(name.property().unwrap().label().is_err());
        assert!(!name.property().unwrap().is_link());
        assert_eq!(name.property().unwrap().range(), None);
    }

    #[test]
    fn test_operation_returns() {
        let node = GraphNode::from_json(&json!({
            "@id": "http://localhost/docs.jsonld#Entrypoint/book",
            "http://www.w3.org/ns/hydra/core#supportedOperation": [
                {"http://www.w3.org/ns/hydra/core#returns": [{"@id": "http://www.w3.org/ns/hydra/core#Collection"}]},
                {"@type": ["http://www.w3.org/ns/hydra/core#Operation"]}
            ]
        }))
        .unwrap();
        let property = Property { node: &node };

        let returns: Vec<_> = property.supported_operations().map(|op| op.returns()).collect();
        assert_eq!(
            returns,
            vec![Some("http://www.w3.org/ns/hydra/core#Collection"), None]
        );
    }
}
