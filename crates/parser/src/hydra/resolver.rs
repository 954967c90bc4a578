//! Second pass turning class IRIs of link fields into resource handles

use api_doc_parser_common::{Field, FieldReference, Resource, ResourceId};

/// Resolve every unresolved link against the extracted resources
///
/// A field links to the first resource whose class has the referenced IRI.
/// Links to classes that no resource exposes degrade to plain values.
/// Running the pass twice changes nothing.
pub fn resolve_references(fields: &mut [Field], resources: &[Resource]) {
    for field in fields.iter_mut() {
        let FieldReference::Unresolved(class_id) = &field.reference else {
            continue;
        };

        field.reference = match resources.iter().position(|r| r.class.id == *class_id) {
            Some(index) => FieldReference::Resolved(ResourceId(index)),
            None => {
                tracing::debug!(
                    field = field.name.as_str(),
                    class = class_id.as_str(),
                    "no resource exposes the referenced class, dropping the link"
                );
                FieldReference::None
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_doc_parser_common::ResourceClass;

    fn resource(name: &str, class_id: &str) -> Resource {
        Resource {
            name: name.to_string(),
            id: format!("http://localhost/{}", name),
            class: ResourceClass {
                id: class_id.to_string(),
                title: name.to_string(),
                fields: Vec::new(),
                readable_fields: Vec::new(),
                writable_fields: Vec::new(),
            },
        }
    }

    fn link(name: &str, class_id: &str) -> Field {
        Field {
            reference: FieldReference::Unresolved(class_id.to_string()),
            range: Some(class_id.to_string()),
            ..Field::new(name, format!("http://schema.org/{}", name))
        }
    }

    #[test]
    fn test_resolve_forward_and_missing_references() {
        let resources = vec![
            resource("books", "http://localhost/docs.jsonld#Book"),
            resource("people", "http://localhost/docs.jsonld#Person"),
        ];
        let mut fields = vec![
            link("author", "http://localhost/docs.jsonld#Person"),
            link("publisher", "http://localhost/docs.jsonld#Organization"),
            Field::new("title", "http://schema.org/name"),
        ];

        resolve_references(&mut fields, &resources);

        assert_eq!(fields[0].reference, FieldReference::Resolved(ResourceId(1)));
        assert_eq!(fields[1].reference, FieldReference::None);
        assert_eq!(fields[2].reference, FieldReference::None);

        let before = fields.clone();
        resolve_references(&mut fields, &resources);
        assert_eq!(fields, before);
    }

    #[test]
    fn test_first_matching_resource_wins() {
        let resources = vec![
            resource("books", "http://localhost/docs.jsonld#Book"),
            resource("novels", "http://localhost/docs.jsonld#Book"),
        ];
        let mut fields = vec![link("related", "http://localhost/docs.jsonld#Book")];

        resolve_references(&mut fields, &resources);

        assert_eq!(fields[0].reference, FieldReference::Resolved(ResourceId(0)));
    }
}
