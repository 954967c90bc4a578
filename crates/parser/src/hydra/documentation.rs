//! Retrieval and normalization of the entrypoint and its API documentation

use super::graph::ExpandedGraph;
use super::link;
use crate::fetch::{DocumentFetcher, FetchConfig};
use crate::jsonld::{self, DocumentLoader, ExpandOptions, FetchingLoader};
use api_doc_parser_common::Result;
use serde_json::Value;

/// Both documents of an API, expanded
#[derive(Debug, Clone)]
pub struct LoadedDocuments {
    pub entrypoint_url: String,
    pub docs_url: String,
    pub docs: ExpandedGraph,
    pub entrypoint: ExpandedGraph,
}

/// Fetch the entrypoint, follow its documentation link and expand both
///
/// The documentation is only fetched once the `Link` header resolved. The two
/// expansions run concurrently and share the fetcher for remote contexts.
pub async fn load<F>(
    fetcher: &F,
    entrypoint_url: &str,
    config: &FetchConfig,
) -> Result<LoadedDocuments>
where
    F: DocumentFetcher + ?Sized,
{
    let response = fetcher.fetch(entrypoint_url, config).await?;
    let docs_url =
        link::documentation_url(response.joined_header("link").as_deref(), &response.url)?;
    tracing::debug!(entrypoint_url, docs_url = docs_url.as_str(), "found API documentation");

    let entrypoint_document = response.into_document()?;
    let docs_document = fetcher.fetch(&docs_url, config).await?.into_document()?;

    let loader = FetchingLoader::new(fetcher, config);
    let (docs, entrypoint) = futures::try_join!(
        normalize(&docs_document, &docs_url, &loader),
        normalize(&entrypoint_document, entrypoint_url, &loader),
    )?;

    Ok(LoadedDocuments {
        entrypoint_url: entrypoint_url.to_string(),
        docs_url,
        docs,
        entrypoint,
    })
}

/// Expand a compact document into a typed graph
pub async fn normalize(
    document: &Value,
    base: &str,
    loader: &dyn DocumentLoader,
) -> Result<ExpandedGraph> {
    let nodes = jsonld::expand(document, &ExpandOptions { base, loader }).await?;
    ExpandedGraph::from_nodes(&nodes)
}
