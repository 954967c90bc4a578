use url::Url;

const KEYWORDS: &[&str] = &[
    "@base",
    "@container",
    "@context",
    "@direction",
    "@graph",
    "@id",
    "@import",
    "@included",
    "@index",
    "@json",
    "@language",
    "@list",
    "@nest",
    "@none",
    "@prefix",
    "@propagate",
    "@protected",
    "@reverse",
    "@set",
    "@type",
    "@value",
    "@version",
    "@vocab",
];

/// Returns true for JSON-LD keywords such as `@id`
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Returns true if the IRI has an RFC 3986 scheme
pub fn is_absolute(iri: &str) -> bool {
    match iri.find(':') {
        Some(pos) => {
            let scheme = &iri[..pos];
            !scheme.is_empty()
                && scheme.as_bytes()[0].is_ascii_alphabetic()
                && scheme
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
        }
        None => false,
    }
}

/// Returns true for blank node identifiers (`_:b0`)
pub fn is_blank_node(s: &str) -> bool {
    s.starts_with("_:")
}

/// Split a compact IRI like `hydra:title` into prefix and suffix
///
/// Strings whose suffix starts with `//` are absolute IRIs, not compact ones.
pub fn split_compact(s: &str) -> Option<(&str, &str)> {
    let pos = s.find(':')?;
    let (prefix, suffix) = (&s[..pos], &s[pos + 1..]);

    if prefix.is_empty() || prefix.contains('/') || suffix.starts_with("//") {
        return None;
    }

    Some((prefix, suffix))
}

/// Resolve a possibly relative IRI reference against a base IRI
///
/// Without a usable base the reference is returned unchanged.
pub fn resolve(base: Option<&str>, reference: &str) -> String {
    if is_absolute(reference) || is_blank_node(reference) {
        return reference.to_string();
    }

    base.and_then(|b| Url::parse(b).ok())
        .and_then(|b| b.join(reference).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| reference.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://www.w3.org/ns/hydra/core#Link"));
        assert!(is_absolute("urn:isbn:0451450523"));
        assert!(is_absolute("hydra:title"));
        assert!(!is_absolute("/books"));
        assert!(!is_absolute("#Book"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn test_split_compact() {
        assert_eq!(split_compact("hydra:title"), Some(("hydra", "title")));
        assert_eq!(split_compact("http://schema.org/name"), None);
        assert_eq!(split_compact("title"), None);
        assert_eq!(split_compact(":title"), None);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve(Some("http://localhost"), "/books"),
            "http://localhost/books"
        );
        assert_eq!(
            resolve(Some("http://localhost/docs.jsonld"), "#Book"),
            "http://localhost/docs.jsonld#Book"
        );
        assert_eq!(
            resolve(Some("http://localhost/contexts/Entrypoint"), "Book"),
            "http://localhost/contexts/Book"
        );
        assert_eq!(
            resolve(Some("http://localhost/"), "http://schema.org/name"),
            "http://schema.org/name"
        );
        assert_eq!(resolve(None, "/books"), "/books");
        assert_eq!(resolve(Some("http://localhost/"), "_:b0"), "_:b0");
    }

    #[test]
    fn test_is_keyword() {
        assert!(is_keyword("@id"));
        assert!(is_keyword("@vocab"));
        assert!(!is_keyword("@foo"));
        assert!(!is_keyword("id"));
    }
}
