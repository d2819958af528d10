//! Charset normalization
//!
//! Every textual resource ends up as UTF-8. The MIME `charset` parameter is
//! trusted first (UTF-8 when absent). A declaration inside the content (CSS
//! `@charset`, HTML `<meta>`) wins only when it names an encoding that is
//! neither UTF-8 nor the MIME one, in which case the raw bytes are decoded
//! again. In-content declarations are removed either way.

use std::sync::OnceLock;

use cssparser::{Parser, ParserInput, Token};
use encoding_rs::{Encoding, UTF_8};
use markup5ever_rcdom::Handle;
use regex::Regex;
use tracing::debug;

use crate::parsers::html::{find_nodes, get_node_attr, html_to_dom, remove_node, serialize_document};
use crate::utils::url::remove_quotes;

pub const UTF8_CHARSET: &str = "utf-8";

fn charset_regex() -> Option<&'static Regex> {
    static CHARSET_RE: OnceLock<Option<Regex>> = OnceLock::new();
    CHARSET_RE
        .get_or_init(|| Regex::new(r"(?i)charset\s*=\s*([^;]+)").ok())
        .as_ref()
}

/// Reads the `charset` parameter of a Content-Type value, lowercased
pub fn get_charset(content_type: &str) -> Option<String> {
    charset_regex()?
        .captures(content_type)
        .map(|captures| remove_quotes(&captures[1]).to_ascii_lowercase())
        .filter(|charset| !charset.is_empty())
}

/// Rewrites the `charset` parameter; textual types without one get it appended
pub fn replace_charset(content_type: &str, charset: &str, is_text: bool) -> String {
    if let Some(charset_re) = charset_regex().filter(|re| re.is_match(content_type)) {
        charset_re
            .replace(content_type, format!("charset={}", charset).as_str())
            .into_owned()
    } else if is_text && !content_type.trim().is_empty() {
        format!("{}; charset={}", content_type.trim_end_matches([';', ' ']), charset)
    } else {
        content_type.to_string()
    }
}

/// Resolves a charset label, defaulting to UTF-8
pub fn encoding_for(charset: Option<&str>) -> &'static Encoding {
    charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decodes bytes with the given charset (a BOM takes precedence)
pub fn decode_text(data: &[u8], charset: Option<&str>) -> String {
    let (text, _, _) = encoding_for(charset).decode(data);
    text.into_owned()
}

/// The encoding a declaration forces on content already decoded with `mime_charset`
fn overriding_encoding(declared: &str, mime_charset: Option<&str>) -> Option<&'static Encoding> {
    let declared = Encoding::for_label(declared.trim().as_bytes())?;
    if declared == UTF_8 || declared == encoding_for(mime_charset) {
        None
    } else {
        Some(declared)
    }
}

/// Finds a leading `@charset "…";` rule, returning its label and byte length
pub fn find_charset_rule(css: &str) -> Option<(String, usize)> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let start = parser.position();

    match parser.next_including_whitespace_and_comments() {
        Ok(Token::AtKeyword(name)) if name.eq_ignore_ascii_case("charset") => {}
        _ => return None,
    }
    let label = match parser.next() {
        Ok(Token::QuotedString(value)) => value.to_ascii_lowercase(),
        _ => return None,
    };
    match parser.next() {
        Ok(Token::Semicolon) => {}
        _ => return None,
    }

    Some((label, parser.slice_from(start).len()))
}

/// Reconciles a stylesheet with its `@charset` rule
///
/// Returns the normalized text and whether the raw bytes had to be decoded again.
pub fn reconcile_stylesheet_charset(
    css: &str,
    raw: &[u8],
    mime_charset: Option<&str>,
) -> (String, bool) {
    let Some((declared, _)) = find_charset_rule(css) else {
        return (css.to_string(), false);
    };

    let (css, redecoded) = match overriding_encoding(&declared, mime_charset) {
        Some(encoding) => {
            debug!(charset = declared.as_str(), "re-decoding stylesheet");
            let (text, _, _) = encoding.decode(raw);
            (text.into_owned(), true)
        }
        None => (css.to_string(), false),
    };

    match find_charset_rule(&css) {
        Some((_, length)) => (css[length..].trim_start().to_string(), redecoded),
        None => (css, redecoded),
    }
}

/// Charset declared by a `<meta>` element, if it is a charset declaration at all
fn meta_charset(node: &Handle) -> Option<String> {
    if let Some(charset) = get_node_attr(node, "charset") {
        return Some(remove_quotes(&charset).to_ascii_lowercase());
    }
    let http_equiv = get_node_attr(node, "http-equiv")?;
    if http_equiv.trim().eq_ignore_ascii_case("content-type") {
        Some(get_node_attr(node, "content").and_then(|content| get_charset(&content)).unwrap_or_default())
    } else {
        None
    }
}

/// Reconciles a document with its `<meta charset>` / `<meta http-equiv=Content-Type>`
///
/// Documents without such elements are returned untouched. Otherwise the
/// elements are removed and the document is serialized again.
pub fn reconcile_document_charset(
    html: &str,
    raw: &[u8],
    mime_charset: Option<&str>,
) -> (String, bool) {
    let dom = html_to_dom(html);
    let declarations: Vec<(Handle, String)> = find_nodes(&dom.document, vec!["meta"])
        .into_iter()
        .filter_map(|node| meta_charset(&node).map(|charset| (node, charset)))
        .collect();

    if declarations.is_empty() {
        return (html.to_string(), false);
    }

    let overriding = declarations
        .iter()
        .find_map(|(_, declared)| overriding_encoding(declared, mime_charset));

    let (dom, redecoded) = match overriding {
        Some(encoding) => {
            debug!(charset = encoding.name(), "re-decoding document");
            let (text, _, _) = encoding.decode(raw);
            (html_to_dom(&text), true)
        }
        None => (dom, false),
    };

    for node in find_nodes(&dom.document, vec!["meta"]) {
        if meta_charset(&node).is_some() {
            remove_node(&node);
        }
    }

    (serialize_document(&dom), redecoded)
}
