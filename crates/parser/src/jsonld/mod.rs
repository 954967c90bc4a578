//! Minimal JSON-LD expansion
//!
//! Turns compact JSON-LD documents into the expanded form (arrays of node
//! objects keyed by full IRIs) the Hydra walker reads. Remote contexts are
//! retrieved through a [`DocumentLoader`] before expansion starts, so the
//! expansion itself is a synchronous walk.
//!
//! ## Supported features
//! - Contexts: inline, remote (by URL), arrays, `null` resets
//! - `@base`, `@vocab`, `@language`, keyword aliases
//! - Term definitions with `@id`, `@reverse`, `@type` coercion
//!   (`@id`, `@vocab`, datatypes), `@container` (`@list`, `@set`,
//!   `@language`, `@index`) and `@language`
//! - `@id`, `@type`, `@value`, `@list`, `@set`, `@graph`
//!
//! Scoped contexts, `@nest`, `@included` and JSON literals are not
//! supported and are ignored.

mod context;
mod error;
mod expand;
pub mod iri;

pub use context::{ActiveContext, Container, RemoteContexts, TermDefinition, TypeMapping};
pub use error::JsonLdError;

use crate::fetch::{DocumentFetcher, FetchConfig};
use api_doc_parser_common::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

/// Upper bound on distinct remote contexts loaded for one document
const MAX_REMOTE_CONTEXTS: usize = 64;

/// Retrieves remote documents (contexts) during expansion
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load the JSON document at `url`
    async fn load(&self, url: &str) -> Result<Value>;
}

/// [`DocumentLoader`] that routes every load through a [`DocumentFetcher`]
pub struct FetchingLoader<'a, F: DocumentFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a FetchConfig,
}

impl<'a, F: DocumentFetcher + ?Sized> FetchingLoader<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a FetchConfig) -> Self {
        Self { fetcher, config }
    }
}

#[async_trait]
impl<'a, F: DocumentFetcher + ?Sized> DocumentLoader for FetchingLoader<'a, F> {
    async fn load(&self, url: &str) -> Result<Value> {
        self.fetcher.fetch(url, self.config).await?.into_document()
    }
}

/// Options of an expansion
pub struct ExpandOptions<'a> {
    /// URL of the document, used to resolve relative IRIs and contexts
    pub base: &'a str,

    /// Loader for remote contexts
    pub loader: &'a dyn DocumentLoader,
}

/// Expand a compact JSON-LD document
pub async fn expand(document: &Value, options: &ExpandOptions<'_>) -> Result<Vec<Value>> {
    let remote = load_remote_contexts(document, options).await?;
    let active = ActiveContext::new(Some(options.base));
    Ok(expand::document(document, &active, &remote)?)
}

/// Load every remote context referenced by the document, transitively
async fn load_remote_contexts(
    document: &Value,
    options: &ExpandOptions<'_>,
) -> Result<RemoteContexts> {
    let mut pending = Vec::new();
    document_context_urls(document, options.base, &mut pending);

    let mut remote = RemoteContexts::new();
    let mut seen = HashSet::new();

    while let Some(url) = pending.pop() {
        if !seen.insert(url.clone()) {
            continue;
        }
        if seen.len() > MAX_REMOTE_CONTEXTS {
            return Err(JsonLdError::ContextOverflow {
                limit: MAX_REMOTE_CONTEXTS,
            }
            .into());
        }

        tracing::debug!(url = url.as_str(), "loading remote JSON-LD context");
        let loaded = options.loader.load(&url).await?;
        let context = match loaded {
            Value::Object(mut map) => map.remove("@context").ok_or_else(|| {
                JsonLdError::InvalidRemoteContext {
                    url: url.clone(),
                    message: "the document has no @context member".to_string(),
                }
            })?,
            _ => {
                return Err(JsonLdError::InvalidRemoteContext {
                    url: url.clone(),
                    message: "the document is not a JSON object".to_string(),
                }
                .into())
            }
        };

        context_urls(&context, &url, &mut pending);
        remote.insert(url, context);
    }

    Ok(remote)
}

/// Collect the URLs of string contexts found anywhere in a document
fn document_context_urls(value: &Value, base: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "@context" {
                    context_urls(child, base, out);
                } else {
                    document_context_urls(child, base, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                document_context_urls(item, base, out);
            }
        }
        _ => {}
    }
}

/// Collect the URLs referenced by a context value
fn context_urls(context: &Value, base: &str, out: &mut Vec<String>) {
    match context {
        Value::String(reference) => out.push(iri::resolve(Some(base), reference)),
        Value::Array(items) => {
            for item in items {
                context_urls(item, base, out);
            }
        }
        _ => {}
    }
}
