use api_doc_parser_common::ParseError;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum JsonLdError {
    #[error("Invalid context: {message}")]
    InvalidContext { message: String },

    #[error("Invalid IRI mapping for term '{term}'")]
    InvalidIriMapping { term: String },

    #[error("Cyclic IRI mapping for term '{term}'")]
    CyclicIriMapping { term: String },

    #[error("Remote context {url} was not loaded")]
    RemoteContextNotLoaded { url: String },

    #[error("Remote context {url} is invalid: {message}")]
    InvalidRemoteContext { url: String, message: String },

    #[error("Context overflow: more than {limit} nested remote contexts")]
    ContextOverflow { limit: usize },

    #[error("Invalid value object: {value}")]
    InvalidValueObject { value: Value },
}

pub type Result<T> = std::result::Result<T, JsonLdError>;

impl From<JsonLdError> for ParseError {
    fn from(err: JsonLdError) -> Self {
        ParseError::JsonLd(err.to_string())
    }
}
