//! Common types and utilities for the API doc parser
//!
//! This crate contains the intermediate API model produced by the parsers
//! (`Api`, `Resource`, `Field`), the error type and the result alias shared
//! by the parser and CLI components.

mod document;
mod model;

pub use document::{ApiDocument, FieldDocument, ResourceDocument};
pub use model::{Api, Field, FieldId, FieldReference, Resource, ResourceClass, ResourceId};

use thiserror::Error;

/// Errors that can occur while discovering and parsing an API
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("The response of {url} has no \"Link\" HTTP header")]
    MissingDocumentationLink { url: String },

    #[error(
        "The \"Link\" HTTP header is not of the type \"http://www.w3.org/ns/hydra/core#apiDocumentation\": {header}"
    )]
    MalformedDocumentationLink { header: String },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Fetching {url} returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("The response of {url} is not JSON-LD (content type: {content_type:?})")]
    NotJsonLd {
        url: String,
        content_type: Option<String>,
    },

    #[error("The class {class_id} doesn't exist.")]
    ClassNotFound { class_id: String },

    #[error("Malformed documentation: {0}")]
    MalformedDocument(String),

    #[error("JSON-LD error: {0}")]
    JsonLd(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_not_found_message() {
        let err = ParseError::ClassNotFound {
            class_id: "http://localhost/docs.jsonld#Book".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The class http://localhost/docs.jsonld#Book doesn't exist."
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParseError = json_err.into();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
