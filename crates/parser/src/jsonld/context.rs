use super::error::{JsonLdError, Result};
use super::iri;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Maximum number of remote contexts that may be chained
pub const MAX_CONTEXT_DEPTH: usize = 10;

/// Remote contexts already retrieved, keyed by absolute URL.
///
/// Values are the `@context` member of the retrieved document.
pub type RemoteContexts = HashMap<String, Value>;

/// Type coercion declared by a term (`@type` in a term definition)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMapping {
    /// Values are IRIs resolved against the base
    Id,
    /// Values are IRIs resolved against the vocabulary
    Vocab,
    /// Values are literals of this datatype
    Datatype(String),
}

/// Container declared by a term (`@container`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List,
    Set,
    Language,
    Index,
}

/// A term definition of the active context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDefinition {
    /// Expanded IRI or keyword, `None` when the term is explicitly unmapped
    pub iri: Option<String>,
    pub reverse: bool,
    pub type_mapping: Option<TypeMapping>,
    pub container: Option<Container>,
    /// `Some(None)` clears the default language for this term
    pub language: Option<Option<String>>,
}

/// The context in effect while expanding a node
#[derive(Debug, Clone, Default)]
pub struct ActiveContext {
    /// URL of the document being expanded
    pub document_base: Option<String>,
    /// Base IRI (`@base`), initially the document URL
    pub base: Option<String>,
    /// Default vocabulary (`@vocab`)
    pub vocab: Option<String>,
    /// Default language (`@language`)
    pub language: Option<String>,
    terms: HashMap<String, TermDefinition>,
}

impl ActiveContext {
    pub fn new(document_base: Option<&str>) -> Self {
        Self {
            document_base: document_base.map(str::to_string),
            base: document_base.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Apply a local context (`@context` value) on top of this one
    pub fn process(&self, local: &Value, remote: &RemoteContexts) -> Result<Self> {
        self.process_with(local, remote, None, 0)
    }

    fn process_with(
        &self,
        local: &Value,
        remote: &RemoteContexts,
        context_url: Option<&str>,
        depth: usize,
    ) -> Result<Self> {
        if depth > MAX_CONTEXT_DEPTH {
            return Err(JsonLdError::ContextOverflow {
                limit: MAX_CONTEXT_DEPTH,
            });
        }

        match local {
            Value::Null => Ok(Self::new(self.document_base.as_deref())),

            Value::String(reference) => {
                let url = iri::resolve(context_url.or(self.document_base.as_deref()), reference);
                let loaded = remote
                    .get(&url)
                    .ok_or_else(|| JsonLdError::RemoteContextNotLoaded { url: url.clone() })?;
                self.process_with(loaded, remote, Some(&url), depth + 1)
            }

            Value::Array(items) => {
                let mut active = self.clone();
                for item in items {
                    active = active.process_with(item, remote, context_url, depth)?;
                }
                Ok(active)
            }

            Value::Object(map) => self.define(map),

            other => Err(JsonLdError::InvalidContext {
                message: format!(
                    "a context must be null, a string, an array or an object, got {}",
                    other
                ),
            }),
        }
    }

    fn define(&self, local: &Map<String, Value>) -> Result<Self> {
        let mut active = self.clone();

        if let Some(base) = local.get("@base") {
            active.base = match base {
                Value::Null => None,
                Value::String(s) => Some(iri::resolve(self.base.as_deref(), s)),
                _ => {
                    return Err(JsonLdError::InvalidContext {
                        message: "@base must be a string or null".to_string(),
                    })
                }
            };
        }

        if let Some(vocab) = local.get("@vocab") {
            active.vocab = match vocab {
                Value::Null => None,
                Value::String(s) if s.is_empty() => active.base.clone(),
                Value::String(s) => active.expand_iri(s, true, true),
                _ => {
                    return Err(JsonLdError::InvalidContext {
                        message: "@vocab must be a string or null".to_string(),
                    })
                }
            };
        }

        if let Some(language) = local.get("@language") {
            active.language = match language {
                Value::Null => None,
                Value::String(s) => Some(s.to_lowercase()),
                _ => {
                    return Err(JsonLdError::InvalidContext {
                        message: "@language must be a string or null".to_string(),
                    })
                }
            };
        }

        let mut defined = HashMap::new();
        for term in local.keys() {
            if term.starts_with('@') {
                continue;
            }
            active.define_term(local, term, &mut defined)?;
        }

        Ok(active)
    }

    fn define_term(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut HashMap<String, bool>,
    ) -> Result<()> {
        match defined.get(term) {
            Some(true) => return Ok(()),
            Some(false) => {
                return Err(JsonLdError::CyclicIriMapping {
                    term: term.to_string(),
                })
            }
            None => {}
        }
        defined.insert(term.to_string(), false);

        let definition = match local.get(term) {
            None | Some(Value::Null) => TermDefinition::default(),
            Some(Value::String(id)) => TermDefinition {
                iri: Some(self.expand_definition_iri(term, id, local, defined)?),
                ..Default::default()
            },
            Some(Value::Object(def)) => self.parse_definition(term, def, local, defined)?,
            Some(_) => {
                return Err(JsonLdError::InvalidIriMapping {
                    term: term.to_string(),
                })
            }
        };

        self.terms.insert(term.to_string(), definition);
        defined.insert(term.to_string(), true);
        Ok(())
    }

    fn parse_definition(
        &mut self,
        term: &str,
        def: &Map<String, Value>,
        local: &Map<String, Value>,
        defined: &mut HashMap<String, bool>,
    ) -> Result<TermDefinition> {
        let mut definition = TermDefinition::default();

        if let Some(reverse) = def.get("@reverse") {
            let reverse = reverse
                .as_str()
                .ok_or_else(|| JsonLdError::InvalidIriMapping {
                    term: term.to_string(),
                })?;
            definition.iri = Some(self.expand_definition_iri(term, reverse, local, defined)?);
            definition.reverse = true;
        } else {
            definition.iri = match def.get("@id") {
                Some(Value::Null) => None,
                Some(Value::String(id)) => {
                    Some(self.expand_definition_iri(term, id, local, defined)?)
                }
                Some(_) => {
                    return Err(JsonLdError::InvalidIriMapping {
                        term: term.to_string(),
                    })
                }
                None => Some(self.default_term_iri(term, local, defined)?),
            };
        }

        if let Some(type_mapping) = def.get("@type") {
            let type_mapping = type_mapping
                .as_str()
                .ok_or_else(|| JsonLdError::InvalidContext {
                    message: format!("@type of term '{}' must be a string", term),
                })?;
            definition.type_mapping = Some(match type_mapping {
                "@id" => TypeMapping::Id,
                "@vocab" => TypeMapping::Vocab,
                other => {
                    TypeMapping::Datatype(self.expand_definition_iri(term, other, local, defined)?)
                }
            });
        }

        if let Some(container) = def.get("@container") {
            definition.container = parse_container(container);
        }

        if let Some(language) = def.get("@language") {
            definition.language = Some(language.as_str().map(str::to_lowercase));
        }

        Ok(definition)
    }

    /// IRI of a term defined without `@id`
    fn default_term_iri(
        &mut self,
        term: &str,
        local: &Map<String, Value>,
        defined: &mut HashMap<String, bool>,
    ) -> Result<String> {
        if let Some((prefix, suffix)) = iri::split_compact(term) {
            if local.contains_key(prefix) {
                self.define_term(local, prefix, defined)?;
            }
            if let Some(TermDefinition {
                iri: Some(prefix_iri),
                ..
            }) = self.terms.get(prefix)
            {
                return Ok(format!("{}{}", prefix_iri, suffix));
            }
        }

        if iri::is_absolute(term) {
            return Ok(term.to_string());
        }

        match &self.vocab {
            Some(vocab) => Ok(format!("{}{}", vocab, term)),
            None => Err(JsonLdError::InvalidIriMapping {
                term: term.to_string(),
            }),
        }
    }

    /// Expand an IRI appearing inside a term definition, defining the local
    /// terms it depends on first
    fn expand_definition_iri(
        &mut self,
        term: &str,
        value: &str,
        local: &Map<String, Value>,
        defined: &mut HashMap<String, bool>,
    ) -> Result<String> {
        if value.starts_with('@') {
            return Ok(value.to_string());
        }

        if value != term && local.contains_key(value) {
            self.define_term(local, value, defined)?;
        }
        if let Some((prefix, _)) = iri::split_compact(value) {
            if prefix != term && local.contains_key(prefix) {
                self.define_term(local, prefix, defined)?;
            }
        }

        self.expand_iri(value, true, false)
            .filter(|expanded| {
                iri::is_keyword(expanded)
                    || iri::is_absolute(expanded)
                    || iri::is_blank_node(expanded)
            })
            .ok_or_else(|| JsonLdError::InvalidIriMapping {
                term: term.to_string(),
            })
    }

    /// Expand an IRI, term, compact IRI or relative reference
    ///
    /// `vocab` allows term and vocabulary expansion (property names, types),
    /// `document_relative` resolves leftovers against the base (`@id`,
    /// `@type`). Returns `None` for explicitly unmapped terms and unknown
    /// keyword-like strings.
    pub fn expand_iri(&self, value: &str, vocab: bool, document_relative: bool) -> Option<String> {
        if value.starts_with('@') {
            return iri::is_keyword(value).then(|| value.to_string());
        }

        if vocab {
            if let Some(definition) = self.terms.get(value) {
                return definition.iri.clone();
            }
        }

        if let Some((prefix, suffix)) = iri::split_compact(value) {
            if prefix == "_" {
                return Some(value.to_string());
            }
            if let Some(TermDefinition {
                iri: Some(prefix_iri),
                ..
            }) = self.terms.get(prefix)
            {
                return Some(format!("{}{}", prefix_iri, suffix));
            }
        }

        if iri::is_absolute(value) {
            return Some(value.to_string());
        }

        if vocab {
            if let Some(vocab) = &self.vocab {
                return Some(format!("{}{}", vocab, value));
            }
        }

        if document_relative {
            return Some(iri::resolve(self.base.as_deref(), value));
        }

        Some(value.to_string())
    }
}

fn parse_container(value: &Value) -> Option<Container> {
    let from_str = |s: &str| match s {
        "@list" => Some(Container::List),
        "@set" => Some(Container::Set),
        "@language" => Some(Container::Language),
        "@index" => Some(Container::Index),
        _ => None,
    };

    match value {
        Value::String(s) => from_str(s),
        Value::Array(items) => items.iter().filter_map(Value::as_str).find_map(from_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HYDRA: &str = "http://www.w3.org/ns/hydra/core#";

    fn process(ctx: Value) -> Result<ActiveContext> {
        ActiveContext::new(Some("http://localhost/docs.jsonld")).process(&ctx, &RemoteContexts::new())
    }

    #[test]
    fn test_prefix_defined_after_use() {
        let ctx = process(json!({
            "supportedClass": "hydra:supportedClass",
            "hydra": HYDRA
        }))
        .unwrap();

        assert_eq!(
            ctx.term("supportedClass").unwrap().iri.as_deref(),
            Some("http://www.w3.org/ns/hydra/core#supportedClass")
        );
        assert_eq!(
            ctx.expand_iri("hydra:title", true, false).as_deref(),
            Some("http://www.w3.org/ns/hydra/core#title")
        );
    }

    #[test]
    fn test_type_coercion_and_container() {
        let ctx = process(json!({
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "range": {"@id": "rdfs:range", "@type": "@id"},
            "tags": {"@id": "http://example.org/tags", "@container": ["@set", "@list"]},
            "created": {"@id": "http://example.org/created", "@type": "xsd:dateTime"}
        }))
        .unwrap();

        assert_eq!(ctx.term("range").unwrap().type_mapping, Some(TypeMapping::Id));
        assert_eq!(ctx.term("tags").unwrap().container, Some(Container::Set));
        assert_eq!(
            ctx.term("created").unwrap().type_mapping,
            Some(TypeMapping::Datatype(
                "http://www.w3.org/2001/XMLSchema#dateTime".to_string()
            ))
        );
    }

    #[test]
    fn test_vocab_and_base() {
        let ctx = process(json!({"@vocab": "http://localhost/docs.jsonld#"})).unwrap();

        assert_eq!(
            ctx.expand_iri("Entrypoint/book", true, false).as_deref(),
            Some("http://localhost/docs.jsonld#Entrypoint/book")
        );
        assert_eq!(
            ctx.expand_iri("/books", false, true).as_deref(),
            Some("http://localhost/books")
        );
        assert_eq!(ctx.expand_iri("@id", true, false).as_deref(), Some("@id"));
        assert_eq!(ctx.expand_iri("@foo", true, false), None);
    }

    #[test]
    fn test_default_term_iri_without_vocab_fails() {
        let result = process(json!({"name": {"@type": "@id"}}));
        assert!(matches!(result, Err(JsonLdError::InvalidIriMapping { .. })));
    }

    #[test]
    fn test_null_term_is_unmapped() {
        let ctx = process(json!({"@vocab": "http://example.org/", "internal": null})).unwrap();
        assert_eq!(ctx.expand_iri("internal", true, false), None);
        assert_eq!(
            ctx.expand_iri("other", true, false).as_deref(),
            Some("http://example.org/other")
        );
    }

    #[test]
    fn test_cyclic_definition() {
        let result = process(json!({"a": "b:x", "b": "a:y"}));
        assert!(matches!(result, Err(JsonLdError::CyclicIriMapping { .. })));
    }

    #[test]
    fn test_remote_context_is_resolved_against_document() {
        let remote = RemoteContexts::from([(
            "http://localhost/contexts/Entrypoint".to_string(),
            json!({"@vocab": "http://localhost/docs.jsonld#"}),
        )]);

        let ctx = ActiveContext::new(Some("http://localhost/"))
            .process(&json!("/contexts/Entrypoint"), &remote)
            .unwrap();
        assert_eq!(ctx.vocab.as_deref(), Some("http://localhost/docs.jsonld#"));

        let missing = ActiveContext::new(Some("http://localhost/"))
            .process(&json!("/contexts/Book"), &remote);
        assert!(matches!(
            missing,
            Err(JsonLdError::RemoteContextNotLoaded { .. })
        ));
    }

    #[test]
    fn test_self_referencing_remote_context_overflows() {
        let remote = RemoteContexts::from([(
            "http://localhost/contexts/Loop".to_string(),
            json!("/contexts/Loop"),
        )]);

        let result = ActiveContext::new(Some("http://localhost/"))
            .process(&json!("/contexts/Loop"), &remote);
        assert!(matches!(result, Err(JsonLdError::ContextOverflow { .. })));
    }

    #[test]
    fn test_null_resets_context() {
        let ctx = process(json!([{"@vocab": "http://example.org/"}, null])).unwrap();
        assert_eq!(ctx.vocab, None);
        assert_eq!(ctx.base.as_deref(), Some("http://localhost/docs.jsonld"));
    }
}
