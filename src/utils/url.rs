use base64::{prelude::BASE64_STANDARD, Engine};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
pub use url::Url;

pub const CID_PROTOCOL: &str = "cid:";
pub const DATA_PROTOCOL: &str = "data:";

/// Characters left alone by JavaScript's `encodeURIComponent()`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Creates a base64 `data:` URL out of a content type and a payload
///
/// Whitespace around content type parameters is dropped, browsers are picky
/// about the media type part of data URLs.
pub fn create_data_url(content_type: &str, data: &[u8]) -> String {
    let media_type: Vec<&str> = content_type
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    let media_type = if media_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        media_type.join(";")
    };

    format!("data:{};base64,{}", media_type, BASE64_STANDARD.encode(data))
}

/// Creates a `data:text/html,` URL with the document percent-encoded
pub fn create_html_data_url(html: &str) -> String {
    format!("data:text/html,{}", utf8_percent_encode(html, URI_COMPONENT))
}

/// Resolves a (possibly relative) reference against a base
///
/// Falls back to the reference itself when either side cannot be parsed, which
/// happens with synthetic resource ids and with `cid:` bases.
pub fn resolve_path(path: &str, base: &str) -> String {
    match Url::parse(base) {
        Ok(base_url) => match base_url.join(path) {
            Ok(resolved_url) => resolved_url.to_string(),
            Err(_) => path.to_string(),
        },
        Err(_) => match Url::parse(path) {
            Ok(parsed_url) => parsed_url.to_string(),
            Err(_) => path.to_string(),
        },
    }
}

/// Base URL to use for content stored under `id`
///
/// Synthetic ids and `cid:` locations cannot anchor relative references, the
/// document's own base is used for those.
pub fn base_for(id: &str, fallback: &str) -> String {
    match Url::parse(id) {
        Ok(url) if !url.cannot_be_a_base() => id.to_string(),
        _ => fallback.to_string(),
    }
}

/// The resolved form of a reference, if resolution turned it into another absolute URL
pub fn absolute_reference(resolved: &str, reference: &str) -> Option<String> {
    if resolved != reference.trim() && Url::parse(resolved).is_ok() {
        Some(resolved.to_string())
    } else {
        None
    }
}

/// Splits an absolute URL into its fragment-less form and its fragment
pub fn split_fragment(url: &str) -> Option<(String, Option<String>)> {
    let mut parsed_url = Url::parse(url).ok()?;
    let fragment = parsed_url.fragment().map(str::to_string);
    parsed_url.set_fragment(None);
    Some((parsed_url.to_string(), fragment))
}

/// Normalizes a URL for comparison purposes (fragment dropped)
pub fn normalize_url(url: &str) -> String {
    split_fragment(url)
        .map(|(url, _)| url)
        .unwrap_or_else(|| url.to_string())
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http:") || url.starts_with("https:")
}

pub fn is_data_url(url: &str) -> bool {
    url.trim_start()
        .get(..DATA_PROTOCOL.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(DATA_PROTOCOL))
}

/// Turns `cid:part1@mail` into the bracketed `<part1@mail>` Content-ID form
pub fn content_id_from_cid_url(url: &str) -> Option<String> {
    let scheme = url.get(..CID_PROTOCOL.len())?;
    if !scheme.eq_ignore_ascii_case(CID_PROTOCOL) {
        return None;
    }
    Some(format!("<{}>", &url[CID_PROTOCOL.len()..]))
}

/// Strips one level of matching single or double quotes
pub fn remove_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].trim();
        }
    }
    value
}
