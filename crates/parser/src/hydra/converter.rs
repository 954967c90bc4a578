//! Conversion of the expanded Hydra graphs into resources and fields

use super::graph::ExpandedGraph;
use super::types::{Documentation, Property, SupportedClass};
use super::vocab;
use api_doc_parser_common::{
    Field, FieldId, FieldReference, ParseError, Resource, ResourceClass, Result,
};

/// Resources discovered from the entrypoint and the field arena they index
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub resources: Vec<Resource>,
    pub fields: Vec<Field>,
}

/// Walk the entrypoint class and build one resource per collection property
///
/// Link fields keep the IRI of their target class as an unresolved reference;
/// see [`super::resolver::resolve_references`].
pub fn extract(
    entrypoint: &ExpandedGraph,
    docs: &ExpandedGraph,
    entrypoint_url: &str,
) -> Result<Extraction> {
    let entrypoint_node = entrypoint
        .root()
        .ok_or_else(|| ParseError::MalformedDocument("the entrypoint is empty".to_string()))?;
    let entrypoint_type = entrypoint_node.first_type().ok_or_else(|| {
        ParseError::MalformedDocument("the entrypoint has no @type".to_string())
    })?;

    let documentation = Documentation::from_graph(docs)?;
    let entrypoint_class = documentation.find_supported_class(entrypoint_type)?;

    let mut extraction = Extraction::default();

    for supported in entrypoint_class.supported_properties() {
        let property = supported.property()?;
        let property_id = property.id()?;

        let Some(class_id) = resource_class_of(&property) else {
            tracing::debug!(
                property = property_id,
                "no operation returns a resource class, skipping"
            );
            continue;
        };

        let class = documentation.find_supported_class(class_id)?;

        let url = entrypoint_node.first_iri(property_id).ok_or_else(|| {
            ParseError::MalformedDocument(format!(
                "the entrypoint has no value for {}",
                property_id
            ))
        })?;

        let resource_class = extract_class(&class, class_id, &mut extraction.fields)?;
        let name = guess_name(url, entrypoint_url);
        tracing::debug!(
            resource = name.as_str(),
            url,
            class = class_id,
            fields = resource_class.fields.len(),
            "discovered resource"
        );

        extraction.resources.push(Resource {
            name,
            id: url.to_string(),
            class: resource_class,
        });
    }

    Ok(extraction)
}

/// Class returned by the first operation that does not return a Hydra class
pub fn resource_class_of<'a>(property: &Property<'a>) -> Option<&'a str> {
    property
        .supported_operations()
        .filter_map(|operation| operation.returns())
        .find(|returns| !vocab::is_hydra_term(returns))
}

fn extract_class(
    class: &SupportedClass<'_>,
    class_id: &str,
    fields: &mut Vec<Field>,
) -> Result<ResourceClass> {
    let mut resource_class = ResourceClass {
        id: class_id.to_string(),
        title: class.title()?.to_string(),
        fields: Vec::new(),
        readable_fields: Vec::new(),
        writable_fields: Vec::new(),
    };

    for supported in class.supported_properties() {
        let property = supported.property()?;
        let range = property.range();

        let reference = match range {
            Some(range) if property.is_link() => FieldReference::Unresolved(range.to_string()),
            _ => FieldReference::None,
        };

        let field = Field {
            name: property.label()?.to_string(),
            id: property.id()?.to_string(),
            range: range.map(str::to_string),
            reference,
            required: supported.required(),
            description: supported.description().to_string(),
        };
        let readable = supported.readable()?;
        let writable = supported.writable()?;

        let id = FieldId(fields.len());
        fields.push(field);
        resource_class.fields.push(id);
        if readable {
            resource_class.readable_fields.push(id);
        }
        if writable {
            resource_class.writable_fields.push(id);
        }
    }

    Ok(resource_class)
}

/// Short resource name from its collection URL
///
/// `http://localhost/api/books` exposed by `http://localhost/api` is `books`.
/// URLs outside the entrypoint fall back to their last path segment.
pub fn guess_name(url: &str, entrypoint_url: &str) -> String {
    let prefix = format!("{}/", entrypoint_url);
    if let Some(name) = url.strip_prefix(&prefix) {
        return name.to_string();
    }

    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .to_string()
}
