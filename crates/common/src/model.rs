//! Intermediate representation of a discovered API
//!
//! Fields live in a single arena owned by [`Api`]. Resources refer to them by
//! [`FieldId`], so a field listed in a class's `fields`, `readable_fields` and
//! `writable_fields` is one and the same value. Links between resources are
//! expressed with [`ResourceId`] handles into [`Api::resources`].

use serde::{Deserialize, Serialize};

/// Index of a field in [`Api::fields`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub usize);

/// Index of a resource in [`Api::resources`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub usize);

/// Link target of a field
///
/// Fields are extracted before every resource is known, so a link starts out
/// as the IRI of the target class and is resolved in a second pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldReference {
    /// Plain value, not a link
    #[default]
    None,

    /// Link to the resource whose class has this IRI, not resolved yet
    Unresolved(String),

    /// Link to a known resource
    Resolved(ResourceId),
}

impl FieldReference {
    /// Whether the field links to another resource once resolved
    pub fn is_link(&self) -> bool {
        !matches!(self, FieldReference::None)
    }

    /// The resolved resource handle, if any
    pub fn resource(&self) -> Option<ResourceId> {
        match self {
            FieldReference::Resolved(id) => Some(*id),
            _ => None,
        }
    }
}

/// A property of a resource class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (the property label)
    pub name: String,

    /// Property IRI
    pub id: String,

    /// Datatype or class IRI of the values
    pub range: Option<String>,

    /// Link target when the property is a link
    pub reference: FieldReference,

    /// Whether a value must be provided
    pub required: bool,

    /// Human readable description (empty when undocumented)
    pub description: String,
}

impl Field {
    /// Create a plain, optional field with no range
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            range: None,
            reference: FieldReference::None,
            required: false,
            description: String::new(),
        }
    }
}

/// Class descriptor of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceClass {
    /// Class IRI
    pub id: String,

    /// Class title
    pub title: String,

    /// Every field of the class, in declaration order
    pub fields: Vec<FieldId>,

    /// Subset of `fields` that can be read
    pub readable_fields: Vec<FieldId>,

    /// Subset of `fields` that can be written
    pub writable_fields: Vec<FieldId>,
}

/// A collection exposed by the API entrypoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Short name guessed from the collection URL (e.g. "books")
    pub name: String,

    /// Collection URL
    pub id: String,

    /// Class of the items of the collection
    pub class: ResourceClass,
}

/// Root descriptor of a parsed API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    /// Entrypoint URL the API was discovered from
    pub entrypoint: String,

    /// API title
    pub title: String,

    /// Resources in entrypoint order
    pub resources: Vec<Resource>,

    /// Field arena referenced by the resource classes
    fields: Vec<Field>,
}

impl Api {
    /// Assemble an API from resolved resources and fields
    ///
    /// Any reference still unresolved at this point can never be resolved and
    /// is degraded to a plain value.
    pub fn new(
        entrypoint: impl Into<String>,
        title: impl Into<String>,
        resources: Vec<Resource>,
        mut fields: Vec<Field>,
    ) -> Self {
        for field in &mut fields {
            if matches!(field.reference, FieldReference::Unresolved(_)) {
                field.reference = FieldReference::None;
            }
        }

        Self {
            entrypoint: entrypoint.into(),
            title: title.into(),
            resources,
            fields,
        }
    }

    /// Every field of every resource, in extraction order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by handle
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)
    }

    /// Look up a resource by handle
    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.0)
    }

    /// Find a resource by its short name
    pub fn find_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// All fields of a class
    pub fn fields_of<'a>(&'a self, class: &'a ResourceClass) -> impl Iterator<Item = &'a Field> {
        self.collect(&class.fields)
    }

    /// Readable fields of a class
    pub fn readable_fields_of<'a>(
        &'a self,
        class: &'a ResourceClass,
    ) -> impl Iterator<Item = &'a Field> {
        self.collect(&class.readable_fields)
    }

    /// Writable fields of a class
    pub fn writable_fields_of<'a>(
        &'a self,
        class: &'a ResourceClass,
    ) -> impl Iterator<Item = &'a Field> {
        self.collect(&class.writable_fields)
    }

    /// The resource a link field points to
    pub fn referenced_resource(&self, field: &Field) -> Option<&Resource> {
        field.reference.resource().and_then(|id| self.resource(id))
    }

    fn collect<'a>(&'a self, ids: &'a [FieldId]) -> impl Iterator<Item = &'a Field> {
        ids.iter().filter_map(move |id| self.field(*id))
    }
}
