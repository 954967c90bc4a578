//! IRIs of the vocabulary terms the parser reads

/// Prefix shared by every Hydra core term
pub const HYDRA_PREFIX: &str = "http://www.w3.org/ns/hydra/core";

/// Hydra core namespace
pub const HYDRA_NS: &str = "http://www.w3.org/ns/hydra/core#";

pub const API_DOCUMENTATION: &str = "http://www.w3.org/ns/hydra/core#apiDocumentation";
pub const SUPPORTED_CLASS: &str = "http://www.w3.org/ns/hydra/core#supportedClass";
pub const SUPPORTED_PROPERTY: &str = "http://www.w3.org/ns/hydra/core#supportedProperty";
pub const SUPPORTED_OPERATION: &str = "http://www.w3.org/ns/hydra/core#supportedOperation";
pub const PROPERTY: &str = "http://www.w3.org/ns/hydra/core#property";
pub const RETURNS: &str = "http://www.w3.org/ns/hydra/core#returns";
pub const TITLE: &str = "http://www.w3.org/ns/hydra/core#title";
pub const DESCRIPTION: &str = "http://www.w3.org/ns/hydra/core#description";
pub const REQUIRED: &str = "http://www.w3.org/ns/hydra/core#required";
pub const READABLE: &str = "http://www.w3.org/ns/hydra/core#readable";
pub const WRITABLE: &str = "http://www.w3.org/ns/hydra/core#writable";
pub const LINK: &str = "http://www.w3.org/ns/hydra/core#Link";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";

/// Title used when the documentation does not declare one
pub const DEFAULT_TITLE: &str = "API Platform";

/// Whether a class IRI belongs to the Hydra vocabulary itself
pub fn is_hydra_term(iri: &str) -> bool {
    iri.starts_with(HYDRA_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hydra_term() {
        assert!(is_hydra_term("http://www.w3.org/ns/hydra/core#Collection"));
        assert!(is_hydra_term(LINK));
        assert!(!is_hydra_term("http://localhost/docs.jsonld#Book"));
        assert!(!is_hydra_term("http://schema.org/Book"));
    }
}
