//! CSS rewriting
//!
//! A stylesheet is walked token by token with `cssparser` and re-emitted.
//! Tokens that do not reference anything are copied byte for byte; `url()`
//! tokens, `url("…")` functions and the target of `@import` rules are resolved
//! against the resource map and replaced with `data:` URLs, each preceded by a
//! `/* original URL: … */` comment. Imported stylesheets are rewritten
//! recursively before being inlined.
//!
//! ```rust
//! use mhtml_to_html::core::{Converter, MhtmlOptions};
//! use mhtml_to_html::parsers::css::{rewrite_css, CssContext};
//! use mhtml_to_html::parsers::mhtml::{Mhtml, Resource, ResourceData};
//!
//! let mut mhtml = Mhtml::default();
//! mhtml.resources.insert(
//!     Resource::new("https://example.com/a.png", "image/png", ResourceData::Binary(vec![1, 2])),
//!     None,
//! );
//! let options = MhtmlOptions::default();
//! let mut converter = Converter::new(&mut mhtml, &options);
//!
//! let css = rewrite_css(&mut converter, "https://example.com/", "p{background:url(a.png)}", CssContext::Stylesheet);
//! assert!(css.contains("url(\"data:image/png;base64,AQI=\")"));
//! ```

use cssparser::{serialize_string, ParseError, Parser, ParserInput, Token};

use crate::core::Converter;
use crate::parsers::mhtml::{ResourceKey, TransferEncoding};
use crate::utils::url::{absolute_reference, base_for, create_data_url, is_data_url};

/// What a piece of CSS text holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CssContext {
    /// A whole stylesheet, `@import` rules are honoured
    Stylesheet,
    /// The value of a `style` attribute
    DeclarationList,
}

/// Memo entry for a stylesheet resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteState {
    /// Being rewritten further up the stack, i.e. an import cycle
    Pending,
    Rewritten(String),
}

pub fn format_quoted_string(string: &str) -> String {
    let mut res: String = "".to_string();
    let _ = serialize_string(string, &mut res);
    res
}

/// Rewrites the references of `css`, resolving them against `base`
pub fn rewrite_css(
    converter: &mut Converter,
    base: &str,
    css: &str,
    context: CssContext,
) -> String {
    converter.count_stylesheet_parse();

    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    process_css(
        converter,
        base,
        &mut parser,
        context == CssContext::Stylesheet,
    )
}

/// Rewritten text of a stylesheet resource, computed once per conversion
///
/// A stylesheet reached again while it is still being rewritten (an `@import`
/// cycle) yields its original text.
pub fn rewrite_stylesheet(
    converter: &mut Converter,
    key: ResourceKey,
    fallback_base: &str,
) -> String {
    let Some(resource) = converter.resource(key) else {
        return String::new();
    };
    let id = resource.id.clone();
    let css = resource.text();

    match converter.stylesheet_state(&id) {
        Some(RewriteState::Rewritten(rewritten)) => return rewritten,
        Some(RewriteState::Pending) => return css,
        None => {}
    }

    converter.set_stylesheet_state(&id, RewriteState::Pending);
    let base = base_for(&id, fallback_base);
    let rewritten = rewrite_css(converter, &base, &css, CssContext::Stylesheet);
    converter.set_stylesheet_state(&id, RewriteState::Rewritten(rewritten.clone()));

    rewritten
}

fn process_css<'i>(
    converter: &mut Converter,
    base: &str,
    parser: &mut Parser<'i, '_>,
    allow_import: bool,
) -> String {
    let mut result: String = "".to_string();
    // Set between `@import` and the first URL of its prelude
    let mut in_import = false;

    loop {
        let token_offset = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::AtKeyword(ref name) => {
                in_import = allow_import && name.eq_ignore_ascii_case("import");
                result.push_str(parser.slice_from(token_offset));
            }
            Token::Semicolon => {
                in_import = false;
                result.push_str(parser.slice_from(token_offset));
            }
            Token::QuotedString(ref value) if in_import => {
                in_import = false;
                match embed_css_reference(converter, base, value, true) {
                    Some(url) => result.push_str(&url),
                    None => result.push_str(parser.slice_from(token_offset)),
                }
            }
            Token::UnquotedUrl(ref value) => {
                let is_import = std::mem::take(&mut in_import);
                match embed_css_reference(converter, base, value, is_import) {
                    Some(url) => result.push_str(&url),
                    None => result.push_str(parser.slice_from(token_offset)),
                }
            }
            Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
                let is_import = std::mem::take(&mut in_import);
                let value = parser
                    .parse_nested_block(|parser| -> Result<String, ParseError<'i, ()>> {
                        Ok(parser.expect_string()?.to_string())
                    })
                    .ok();

                match value.and_then(|value| embed_css_reference(converter, base, &value, is_import))
                {
                    Some(url) => result.push_str(&url),
                    None => result.push_str(parser.slice_from(token_offset)),
                }
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                let closing = match token {
                    Token::SquareBracketBlock => ']',
                    Token::CurlyBracketBlock => '}',
                    _ => ')',
                };
                if closing == '}' {
                    in_import = false;
                }

                result.push_str(parser.slice_from(token_offset));
                let nested = parser
                    .parse_nested_block(|parser| -> Result<String, ParseError<'i, ()>> {
                        Ok(process_css(converter, base, parser, false))
                    })
                    .unwrap_or_default();
                result.push_str(&nested);

                // Blocks left open at the end of input stay open
                if parser.slice_from(token_offset).ends_with(closing) {
                    result.push(closing);
                }
            }
            _ => result.push_str(parser.slice_from(token_offset)),
        }
    }

    result
}

/// Replacement text for one referenced URL, `None` to keep the source text
fn embed_css_reference(
    converter: &mut Converter,
    base: &str,
    reference: &str,
    is_import: bool,
) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with('#') || is_data_url(reference) {
        return None;
    }

    let (resolved, key) = converter.lookup_reference(base, reference);
    let Some(key) = key else {
        let transfer_encoding = if is_import {
            None
        } else {
            Some(TransferEncoding::Base64)
        };
        converter.record_missing(&resolved, transfer_encoding);
        return absolute_reference(&resolved, reference)
            .map(|url| format!("url({})", format_quoted_string(&url)));
    };

    let resource = converter.resource(key)?;
    let id = resource.id.clone();
    let content_type = resource.content_type.clone();
    let is_stylesheet = is_import || resource.is_stylesheet();

    let data_url = if is_stylesheet {
        let css = rewrite_stylesheet(converter, key, base);
        if converter.is_dry_run() {
            return None;
        }
        create_data_url(&content_type, css.as_bytes())
    } else {
        if converter.is_dry_run() {
            return None;
        }
        converter.resource(key)?.to_data_url()
    };
    converter.mark_used(key);

    let mut result: String = "".to_string();
    if !is_data_url(&id) {
        let id = id.replace("*/", "*\\/").replace('<', "\\3c ");
        result.push_str(&format!("/* original URL: {} */", id));
    }
    result.push_str("url(");
    result.push_str(&format_quoted_string(&data_url));
    result.push(')');

    Some(result)
}
