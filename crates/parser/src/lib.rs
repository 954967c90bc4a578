//! Hydra API documentation parsing
//!
//! This crate discovers a hypermedia API from its entrypoint URL and turns
//! its Hydra documentation into the intermediate representation (`Api`).
//!
//! ## Parsing Strategy
//!
//! API Platform style APIs advertise their documentation through a `Link`
//! header on the entrypoint:
//! - `fetch` retrieves JSON-LD documents with content negotiation
//! - `jsonld` expands compact documents (loading remote contexts)
//! - `hydra` walks the expanded documentation and entrypoint
//!
//! Entrypoint properties are mapped to resources:
//! - an operation returning a non-Hydra class → resource of that class
//! - supported properties of the class → fields
//! - `hydra:Link` properties → references to other resources

pub mod fetch;
pub mod hydra;
pub mod jsonld;

pub use fetch::{DocumentFetcher, FetchConfig, FetchResponse, HttpFetcher, RequestBody};
pub use hydra::HydraParser;

use api_doc_parser_common::{Api, Result};

/// Parse the Hydra documentation of the API at `entrypoint_url`
///
/// # Arguments
/// * `entrypoint_url` - URL of the API entrypoint (e.g. "https://demo.api-platform.com")
/// * `config` - Headers, body and timeout applied to every request
///
/// # Returns
/// * `Api` - Intermediate representation of the API
pub async fn parse_hydra_documentation(entrypoint_url: &str, config: &FetchConfig) -> Result<Api> {
    HydraParser::new()
        .with_config(config.clone())
        .parse(entrypoint_url)
        .await
}
