//! Serializable view of an [`Api`]
//!
//! The arena model cannot be dumped as-is for downstream generators: field
//! handles mean nothing outside the process and links between resources may
//! form cycles. [`ApiDocument`] inlines every field and names link targets
//! instead.

use crate::model::{Api, Field, FieldId, Resource};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Output shape consumed by generators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
    pub entrypoint_url: String,
    pub title: String,
    pub resources: Vec<ResourceDocument>,
}

/// A resource with its fields inlined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDocument {
    pub name: String,
    pub id: String,
    pub class_id: String,
    pub title: String,
    pub fields: Vec<FieldDocument>,

    /// Names of the readable fields
    pub readable_fields: Vec<String>,

    /// Names of the writable fields
    pub writable_fields: Vec<String>,
}

/// A field with its link target rendered as a resource name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDocument {
    pub name: String,
    pub id: String,
    pub range: Option<String>,
    pub reference: Option<String>,
    pub required: bool,
    pub description: String,
}

impl Api {
    /// Build the serializable view of this API
    pub fn to_document(&self) -> ApiDocument {
        ApiDocument {
            entrypoint_url: self.entrypoint.clone(),
            title: self.title.clone(),
            resources: self
                .resources
                .iter()
                .map(|r| self.resource_document(r))
                .collect(),
        }
    }

    /// Render the API as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Render the API as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_document())?)
    }

    fn resource_document(&self, resource: &Resource) -> ResourceDocument {
        let names = |ids: &[FieldId]| -> Vec<String> {
            ids.iter()
                .filter_map(|id| self.field(*id))
                .map(|f| f.name.clone())
                .collect()
        };

        ResourceDocument {
            name: resource.name.clone(),
            id: resource.id.clone(),
            class_id: resource.class.id.clone(),
            title: resource.class.title.clone(),
            fields: self
                .fields_of(&resource.class)
                .map(|f| self.field_document(f))
                .collect(),
            readable_fields: names(&resource.class.readable_fields),
            writable_fields: names(&resource.class.writable_fields),
        }
    }

    fn field_document(&self, field: &Field) -> FieldDocument {
        FieldDocument {
            name: field.name.clone(),
            id: field.id.clone(),
            range: field.range.clone(),
            reference: self.referenced_resource(field).map(|r| r.name.clone()),
            required: field.required,
            description: field.description.clone(),
        }
    }
}
