//! Hydra API documentation parser
//!
//! Builds the [`Api`](api_doc_parser_common::Api) model of a hypermedia API
//! described with the Hydra Core vocabulary (as served by API Platform).
//!
//! ## Pipeline
//! 1. Fetch the entrypoint and read its `Link` header to find the
//!    `hydra:apiDocumentation` URL
//! 2. Fetch the documentation, then expand both JSON-LD documents
//!    concurrently
//! 3. Walk the entrypoint class: every property with an operation returning
//!    a non-Hydra class becomes a resource, and the properties of that class
//!    become its fields
//! 4. Resolve link fields to the resources exposing their range
//!
//! ## Usage
//! ```rust,ignore
//! use api_doc_parser_hydra::hydra::HydraParser;
//!
//! let api = HydraParser::new().parse("https://demo.api-platform.com").await?;
//! for resource in &api.resources {
//!     println!("{} ({})", resource.name, resource.id);
//! }
//! ```

mod converter;
mod documentation;
mod graph;
mod link;
mod parser;
mod resolver;
mod types;
pub mod vocab;

pub use converter::{extract, guess_name, resource_class_of, Extraction};
pub use documentation::{load, normalize, LoadedDocuments};
pub use graph::{ExpandedGraph, GraphNode, GraphTerm, ValueNode};
pub use link::documentation_url;
pub use parser::{build_api, HydraParser};
pub use resolver::resolve_references;
pub use types::{Documentation, Operation, Property, SupportedClass, SupportedProperty};
