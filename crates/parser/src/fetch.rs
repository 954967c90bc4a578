//! JSON-LD document fetching
//!
//! Every document the parser needs (entrypoint, API documentation, remote
//! JSON-LD contexts) goes through a [`DocumentFetcher`] so that content
//! negotiation and caller supplied headers are applied uniformly.

use api_doc_parser_common::{ParseError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Media type of JSON-LD documents
pub const JSON_LD_MIME_TYPE: &str = "application/ld+json";

/// Request body sent with every fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestBody {
    /// Raw body, sent with a JSON-LD content type unless one is configured
    Text(String),

    /// Multipart form fields, never given a JSON-LD content type
    Multipart(BTreeMap<String, String>),
}

/// Request configuration passed unchanged to every fetch of a parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTP method (GET when unset, POST when a body is configured)
    pub method: Option<String>,

    /// Extra request headers
    pub headers: BTreeMap<String, String>,

    /// Optional request body
    pub body: Option<RequestBody>,

    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl FetchConfig {
    /// Load fetch configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParseError::Config(format!("Failed to read fetch config {:?}: {}", path, e))
        })?;

        let mut config: Self = serde_yaml::from_str(&content).map_err(|e| {
            ParseError::Config(format!("Failed to parse fetch config {:?}: {}", path, e))
        })?;

        let headers = std::mem::take(&mut config.headers);
        Ok(headers
            .into_iter()
            .fold(config, |config, (name, value)| config.with_header(name, value)))
    }

    /// Add or replace a request header
    ///
    /// Header names are case-insensitive: an existing header differing only in
    /// case is replaced.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Compute the request headers for a fetch
///
/// `Accept` defaults to JSON-LD. `Content-Type` defaults to JSON-LD only when a
/// non-multipart body is present. Headers set by the caller always win.
pub fn negotiate(config: &FetchConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ParseError::Config(format!("Invalid header name {:?}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            ParseError::Config(format!("Invalid value for header {:?}: {}", name, e))
        })?;
        headers.insert(header_name, header_value);
    }

    if !headers.contains_key(ACCEPT) {
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_LD_MIME_TYPE));
    }

    if matches!(config.body, Some(RequestBody::Text(_))) && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_LD_MIME_TYPE));
    }

    Ok(headers)
}

/// A fetched document
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL of the response
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Parsed body, only present for JSON-LD responses
    pub body: Option<Value>,
}

impl FetchResponse {
    /// Build a JSON-LD response (mostly useful for fakes and tests)
    pub fn json_ld(url: impl Into<String>, body: Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_LD_MIME_TYPE));
        Self {
            url: url.into(),
            status: 200,
            headers,
            body: Some(body),
        }
    }

    /// Attach a header, ignoring invalid names or values
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// First value of a header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every value of a header joined with `", "`, as if sent on one line
    pub fn joined_header(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// The `Content-Type` header
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Whether the response announces a JSON-LD body
    pub fn is_json_ld(&self) -> bool {
        is_json_ld(self.content_type())
    }

    /// Take the parsed JSON-LD body, failing when the response had none
    pub fn into_document(self) -> Result<Value> {
        let content_type = self.content_type().map(str::to_string);
        self.body.ok_or(ParseError::NotJsonLd {
            url: self.url,
            content_type,
        })
    }
}

fn is_json_ld(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains(JSON_LD_MIME_TYPE))
}

/// Retrieves JSON-LD documents
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url` with content negotiation for JSON-LD
    async fn fetch(&self, url: &str, config: &FetchConfig) -> Result<FetchResponse>;
}

/// [`DocumentFetcher`] backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(config: &FetchConfig) -> Result<Method> {
        match config.method.as_deref() {
            None if config.body.is_some() => Ok(Method::POST),
            None => Ok(Method::GET),
            Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|e| ParseError::Config(format!("Invalid HTTP method {:?}: {}", m, e))),
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, config: &FetchConfig) -> Result<FetchResponse> {
        let mut request = self
            .client
            .request(Self::method(config)?, url)
            .headers(negotiate(config)?);

        if let Some(timeout) = config.timeout() {
            request = request.timeout(timeout);
        }

        request = match &config.body {
            Some(RequestBody::Text(text)) => request.body(text.clone()),
            Some(RequestBody::Multipart(parts)) => {
                let form = parts
                    .iter()
                    .fold(reqwest::multipart::Form::new(), |form, (k, v)| {
                        form.text(k.clone(), v.clone())
                    });
                request.multipart(form)
            }
            None => request,
        };

        tracing::debug!(url, "fetching document");

        let response = request.send().await.map_err(|e| ParseError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParseError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

        let body = if is_json_ld(content_type) {
            let text = response.text().await.map_err(|e| ParseError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            Some(serde_json::from_str(&text)?)
        } else {
            None
        };

        Ok(FetchResponse {
            url: final_url,
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
