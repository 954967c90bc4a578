//! Hydra API documentation parser

use super::converter;
use super::documentation::{self, LoadedDocuments};
use super::graph::ExpandedGraph;
use super::resolver;
use super::types::Documentation;
use super::vocab;
use crate::fetch::{DocumentFetcher, FetchConfig, HttpFetcher};
use api_doc_parser_common::{Api, Result};

/// Hydra API documentation parser
///
/// Discovers an API from its entrypoint: follows the `Link` header to the
/// documentation, expands both documents and builds the [`Api`] model.
pub struct HydraParser<F: DocumentFetcher = HttpFetcher> {
    /// Transport used for every document and remote context
    fetcher: F,

    /// Request configuration applied to every fetch
    config: FetchConfig,
}

impl HydraParser<HttpFetcher> {
    /// Create a parser fetching over HTTP
    ///
    /// # Example
    /// ```rust,ignore
    /// let api = HydraParser::new().parse("https://demo.api-platform.com").await?;
    /// ```
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }
}

impl Default for HydraParser<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DocumentFetcher> HydraParser<F> {
    /// Create a parser with a custom fetcher
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            config: FetchConfig::default(),
        }
    }

    /// Set the request configuration (headers, body, timeout)
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Parse the API exposed at `entrypoint_url`
    ///
    /// Any failure aborts the parse; no partial API is returned.
    pub async fn parse(&self, entrypoint_url: &str) -> Result<Api> {
        tracing::info!(entrypoint = entrypoint_url, "parsing Hydra documentation");

        let LoadedDocuments {
            docs, entrypoint, ..
        } = documentation::load(&self.fetcher, entrypoint_url, &self.config).await?;

        let api = build_api(entrypoint_url, &docs, &entrypoint)?;

        tracing::info!(
            title = api.title.as_str(),
            resources = api.resources.len(),
            "parsed Hydra documentation"
        );

        Ok(api)
    }
}

/// Build the API model from already expanded documents
pub fn build_api(
    entrypoint_url: &str,
    docs: &ExpandedGraph,
    entrypoint: &ExpandedGraph,
) -> Result<Api> {
    let mut extraction = converter::extract(entrypoint, docs, entrypoint_url)?;
    resolver::resolve_references(&mut extraction.fields, &extraction.resources);

    let title = Documentation::from_graph(docs)?
        .title()
        .unwrap_or(vocab::DEFAULT_TITLE);

    Ok(Api::new(
        entrypoint_url,
        title,
        extraction.resources,
        extraction.fields,
    ))
}
