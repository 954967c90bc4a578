//! Discovery of the API documentation through the `Link` response header

use super::vocab;
use crate::jsonld::iri;
use api_doc_parser_common::{ParseError, Result};

/// Extract the API documentation URL from a `Link` header value
///
/// The header may carry several comma separated links; the first one whose
/// `rel` parameter lists `hydra:apiDocumentation` wins. A relative target is
/// resolved against `response_url`.
pub fn documentation_url(header: Option<&str>, response_url: &str) -> Result<String> {
    let header = header.ok_or_else(|| ParseError::MissingDocumentationLink {
        url: response_url.to_string(),
    })?;

    split_links(header)
        .into_iter()
        .filter_map(parse_link)
        .find(|link| link.rels.iter().any(|rel| *rel == vocab::API_DOCUMENTATION))
        .map(|link| iri::resolve(Some(response_url), link.target))
        .ok_or_else(|| ParseError::MalformedDocumentationLink {
            header: header.to_string(),
        })
}

struct Link<'a> {
    target: &'a str,
    rels: Vec<&'a str>,
}

/// Split a header value on the commas separating links, ignoring commas
/// inside `<...>` targets and quoted parameters
fn split_links(header: &str) -> Vec<&str> {
    let mut links = Vec::new();
    let mut start = 0;
    let mut in_target = false;
    let mut in_quotes = false;

    for (i, c) in header.char_indices() {
        match c {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                links.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    links.push(&header[start..]);

    links
}

fn parse_link(link: &str) -> Option<Link<'_>> {
    let link = link.trim();
    let rest = link.strip_prefix('<')?;
    let end = rest.find('>')?;
    let target = rest[..end].trim();

    let mut rels = Vec::new();
    for param in rest[end + 1..].split(';') {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("rel") {
            let value = value.trim().trim_matches('"');
            rels.extend(value.split_whitespace());
        }
    }

    Some(Link { target, rels })
}
