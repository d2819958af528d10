//! MIME header blocks
//!
//! Header names are matched case-insensitively. A repeated header replaces the
//! earlier value, folded continuation lines are appended to the header above.

use base64::{prelude::BASE64_STANDARD_NO_PAD, Engine};
use encoding_rs::{Encoding, UTF_8};

use super::scanner::{decode_quoted_printable, strip_line_ending};
use crate::utils::url::remove_quotes;

pub const CONTENT_ID: &str = "Content-ID";
pub const CONTENT_LOCATION: &str = "Content-Location";
pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
pub const CONTENT_TYPE: &str = "Content-Type";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
    last_name: Option<String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let value = value.trim().to_string();
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self.last_name = Some(name.to_string());
    }

    /// Feeds one raw header line into the block
    ///
    /// Lines starting with whitespace, and lines without a colon, continue the
    /// previous header.
    pub fn push_line(&mut self, line: &[u8]) {
        let line = decode_header_bytes(strip_line_ending(line));
        let is_continuation = line.starts_with([' ', '\t']);

        match line.find(':') {
            Some(colon) if !is_continuation => {
                self.insert(line[..colon].trim(), &line[colon + 1..]);
            }
            _ => {
                let folded = line.trim();
                if folded.is_empty() {
                    return;
                }
                if let Some(name) = &self.last_name {
                    if let Some(entry) = self
                        .entries
                        .iter_mut()
                        .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    {
                        if !entry.1.is_empty() {
                            entry.1.push(' ');
                        }
                        entry.1.push_str(folded);
                    }
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Header bytes are ASCII in theory; anything else is taken as UTF-8, then Windows-1252
fn decode_header_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Extracts the `boundary` parameter of a multipart Content-Type
pub fn get_boundary(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let param = param.trim();
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("boundary") {
            let boundary = remove_quotes(value);
            (!boundary.is_empty()).then(|| boundary.to_string())
        } else {
            None
        }
    })
}

/// Decodes RFC 2047 encoded-words (`=?charset?B|Q?text?=`) in a header value
///
/// Whitespace between two adjacent encoded-words is dropped. A malformed word is
/// kept verbatim.
pub fn decode_encoded_words(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut remaining = input;
    let mut last_was_encoded = false;

    while let Some(start) = remaining.find("=?") {
        let before = &remaining[..start];
        if !last_was_encoded || !before.trim().is_empty() {
            result.push_str(before);
        }

        match decode_encoded_word(&remaining[start + 2..]) {
            Some((text, consumed)) => {
                result.push_str(&text);
                remaining = &remaining[start + 2 + consumed..];
                last_was_encoded = true;
            }
            None => {
                result.push_str("=?");
                remaining = &remaining[start + 2..];
                last_was_encoded = false;
            }
        }
    }

    result.push_str(remaining);
    result
}

/// Decodes `charset?encoding?text?=`, returning the text and the bytes consumed
fn decode_encoded_word(word: &str) -> Option<(String, usize)> {
    let (charset, rest) = word.split_once('?')?;
    let (encoding, rest) = rest.split_once('?')?;
    let end = rest.find("?=")?;
    let encoded_text = &rest[..end];
    let consumed = charset.len() + 1 + encoding.len() + 1 + end + 2;

    let bytes = if encoding.eq_ignore_ascii_case("B") {
        BASE64_STANDARD_NO_PAD
            .decode(encoded_text.trim_end_matches('='))
            .ok()?
    } else if encoding.eq_ignore_ascii_case("Q") {
        decode_quoted_printable(encoded_text.replace('_', " ").as_bytes())
    } else {
        return None;
    };

    // RFC 2231 language suffix: charset*lang
    let charset = charset.split('*').next().unwrap_or(charset);
    let encoding = Encoding::for_label(charset.as_bytes()).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(&bytes);

    Some((text.into_owned(), consumed))
}
