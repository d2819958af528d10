//! MIME demultiplexer
//!
//! A four-state machine walks the archive line by line:
//!
//! - `Headers`: top-level header block, up to the first delimiter
//! - `Content`: header block of one part
//! - `Data`: payload of one part, up to the next delimiter
//! - `End`: closing delimiter or end of input
//!
//! A message without a `boundary` is a single part whose headers are the
//! top-level ones. A nested `multipart/*` part is parsed recursively into the
//! same resource map, and its root document becomes the archive index.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use tracing::debug;

use crate::core::{
    detect_media_type, is_document_media_type, is_plaintext_media_type,
    is_stylesheet_media_type,
};

use super::charset::{
    decode_text, get_charset, reconcile_document_charset, reconcile_stylesheet_charset,
    replace_charset, UTF8_CHARSET,
};
use super::headers::{
    get_boundary, Headers, CONTENT_ID, CONTENT_LOCATION, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE,
};
use super::resource::{Mhtml, Resource, ResourceData, ResourceMap, TransferEncoding};
use super::scanner::{
    decode_base64, decode_quoted_printable, index_of, is_line_feed, starts_with_boundary,
    strip_line_ending, strip_soft_line_break, Scanner,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Headers,
    Content,
    Data,
    End,
}

/// Kind of delimiter line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Delimiter {
    /// `--boundary`
    Part,
    /// `--boundary--`
    Close,
}

/// A part whose headers have been read but whose payload has not
struct Part {
    id: String,
    content_type: Option<String>,
    content_id: Option<String>,
    transfer_encoding: Option<TransferEncoding>,
    /// Start of the part's header block, kept for nested multipart parts
    embedded_start: Option<usize>,
}

struct MimeParser<'a, 'r> {
    scanner: Scanner<'a>,
    resources: &'r mut ResourceMap,
    headers: Headers,
    part_headers: Headers,
    part_start: Option<usize>,
    part: Option<Part>,
    boundary: Option<String>,
    index: Option<String>,
}

/// Parses a whole archive into memory
pub fn parse(data: &[u8]) -> Mhtml {
    let mut resources = ResourceMap::new();
    let (headers, index) = parse_into(data, &mut resources);

    debug!(
        resources = resources.len(),
        index = index.as_deref().unwrap_or_default(),
        "parsed archive"
    );

    Mhtml {
        headers,
        resources,
        index,
    }
}

fn parse_into(data: &[u8], resources: &mut ResourceMap) -> (Headers, Option<String>) {
    let mut parser = MimeParser {
        scanner: Scanner::new(data),
        resources,
        headers: Headers::new(),
        part_headers: Headers::new(),
        part_start: None,
        part: None,
        boundary: None,
        index: None,
    };
    parser.run();
    (parser.headers, parser.index)
}

impl MimeParser<'_, '_> {
    fn run(&mut self) {
        let mut state = State::Headers;

        while state != State::End && self.can_continue(state) {
            state = match state {
                State::Headers => self.read_headers(),
                State::Content => self.read_part_headers(),
                State::Data => self.read_data(),
                State::End => State::End,
            };
        }

        // Headers ended the input: the part has an empty payload
        if let Some(part) = self.part.take() {
            if part.embedded_start.is_none() {
                self.finalize(part, Vec::new());
            }
        }
    }

    /// A payload may be a single byte, header lines never are
    fn can_continue(&self, state: State) -> bool {
        match state {
            State::Data => !self.scanner.is_at_end(),
            _ => self.scanner.has_more(),
        }
    }

    fn read_headers(&mut self) -> State {
        let line = self.scanner.get_line();
        if !is_line_feed(line) {
            self.headers.push_line(line);
            return State::Headers;
        }

        self.boundary = self.headers.get(CONTENT_TYPE).and_then(get_boundary);
        if let Some(boundary) = self.boundary.clone() {
            // Skip the preamble
            while self.scanner.has_more() {
                match match_delimiter(self.scanner.get_line(), &boundary) {
                    Some(Delimiter::Part) => return State::Content,
                    Some(Delimiter::Close) => return State::End,
                    None => {}
                }
            }
            return State::End;
        }

        // No declared boundary: a delimiter right after the headers still counts
        let position = self.scanner.position();
        let line = self.scanner.get_line();
        if starts_with_boundary(line) {
            let boundary = String::from_utf8_lossy(strip_line_ending(&line[2..]))
                .trim()
                .to_string();
            if !boundary.is_empty() {
                self.boundary = Some(boundary);
                return State::Content;
            }
        }
        self.scanner.set_position(position);

        let headers = self.headers.clone();
        self.part = Some(self.init_part(&headers, None));
        State::Data
    }

    fn read_part_headers(&mut self) -> State {
        if self.part_start.is_none() {
            self.part_start = Some(self.scanner.position());
        }

        let line = self.scanner.get_line();
        if !is_line_feed(line) {
            self.part_headers.push_line(line);
            return State::Content;
        }

        let headers = std::mem::take(&mut self.part_headers);
        let start = self.part_start.take();
        self.part = Some(self.init_part(&headers, start));
        State::Data
    }

    fn init_part(&self, headers: &Headers, start: Option<usize>) -> Part {
        let content_type = headers
            .get(CONTENT_TYPE)
            .map(str::trim)
            .filter(|content_type| !content_type.is_empty())
            .map(str::to_string);
        let id = headers
            .get(CONTENT_LOCATION)
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| synthetic_id(self.resources));
        let is_multipart = content_type
            .as_deref()
            .is_some_and(|content_type| content_type.to_ascii_lowercase().starts_with("multipart/"));

        Part {
            id,
            content_id: headers.get(CONTENT_ID).map(str::to_string),
            transfer_encoding: headers
                .get(CONTENT_TRANSFER_ENCODING)
                .and_then(TransferEncoding::from_header),
            embedded_start: if is_multipart { start } else { None },
            content_type,
        }
    }

    fn read_data(&mut self) -> State {
        let Some(part) = self.part.take() else {
            return State::Content;
        };

        let mut payload: Vec<u8> = Vec::new();
        let mut end_of_data = None;
        let mut next_state = State::End;

        while !self.scanner.is_at_end() {
            let line_start = self.scanner.position();
            let line = self.scanner.get_line();

            if let Some(boundary) = &self.boundary {
                if let Some(delimiter) = match_delimiter(line, boundary) {
                    end_of_data = Some(line_start);
                    next_state = match delimiter {
                        Delimiter::Part => State::Content,
                        Delimiter::Close => State::End,
                    };
                    break;
                }
            }

            match part.transfer_encoding {
                Some(TransferEncoding::QuotedPrintable) => {
                    let (line, _) = strip_soft_line_break(line);
                    payload.extend_from_slice(&decode_quoted_printable(line));
                }
                Some(TransferEncoding::Base64) => {
                    payload.extend_from_slice(strip_line_ending(line));
                }
                _ => payload.extend_from_slice(line),
            }
        }

        // The line break preceding a delimiter belongs to the delimiter
        if end_of_data.is_some() {
            let length = strip_line_ending(&payload).len();
            payload.truncate(length);
        }

        match part.embedded_start {
            Some(start) => {
                let end = end_of_data.unwrap_or(self.scanner.len());
                let embedded = strip_line_ending(self.scanner.slice(start, end));
                let (_, index) = parse_into(embedded, self.resources);
                debug!(part = part.id.as_str(), "parsed embedded multipart");
                if index.is_some() {
                    self.index = index;
                }
            }
            None => self.finalize(part, payload),
        }

        next_state
    }

    /// Transfer-decodes the payload, normalizes its charset and registers it
    fn finalize(&mut self, part: Part, payload: Vec<u8>) {
        let raw = match part.transfer_encoding {
            Some(TransferEncoding::Base64) => decode_base64(&payload).unwrap_or_else(|| {
                debug!(part = part.id.as_str(), "invalid base64 payload kept as is");
                payload
            }),
            _ => payload,
        };

        let content_type = part
            .content_type
            .unwrap_or_else(|| detect_media_type(&raw, &part.id));
        let resource = build_resource(&part.id, &content_type, raw, part.transfer_encoding);

        debug!(
            part = part.id.as_str(),
            content_type = content_type.as_str(),
            transfer_encoding = part.transfer_encoding.map(|e| e.as_str()).unwrap_or_default(),
            "parsed part"
        );

        if self.index.is_none() && resource.is_document() {
            self.index = Some(part.id.clone());
        }

        self.resources.insert(resource, part.content_id.as_deref());
    }
}

/// Builds a resource from transfer-decoded bytes
///
/// Textual content is decoded with its declared charset (reconciled with an
/// in-content declaration for stylesheets and documents) and re-labelled as
/// UTF-8. Anything else is kept as bytes and tagged for base64 inlining.
pub fn build_resource(
    id: &str,
    content_type: &str,
    raw: Vec<u8>,
    transfer_encoding: Option<TransferEncoding>,
) -> Resource {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let is_text = is_plaintext_media_type(&media_type);

    let (data, transfer_encoding) = if is_text {
        let charset = get_charset(content_type);
        let text = decode_text(&raw, charset.as_deref());
        let (text, redecoded) = if is_stylesheet_media_type(&media_type) {
            reconcile_stylesheet_charset(&text, &raw, charset.as_deref())
        } else if is_document_media_type(&media_type) {
            reconcile_document_charset(&text, &raw, charset.as_deref())
        } else {
            (text, false)
        };
        if redecoded {
            debug!(part = id, "charset declaration overrides MIME charset");
        }
        (ResourceData::Text(text), transfer_encoding)
    } else {
        (ResourceData::Binary(raw), Some(TransferEncoding::Base64))
    };

    Resource {
        id: id.to_string(),
        content_type: replace_charset(content_type, UTF8_CHARSET, is_text),
        transfer_encoding,
        data,
        used: false,
    }
}

/// Recognizes `--boundary` and `--boundary--` lines (leading and trailing whitespace tolerated)
fn match_delimiter(line: &[u8], boundary: &str) -> Option<Delimiter> {
    let line = strip_line_ending(line);
    let delimiter = format!("--{}", boundary);
    let start = index_of(line, &delimiter)?;

    if !line[..start].iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    let rest = &line[start + delimiter.len()..];
    if rest.starts_with(b"--") {
        Some(Delimiter::Close)
    } else if rest.iter().all(u8::is_ascii_whitespace) {
        Some(Delimiter::Part)
    } else {
        None
    }
}

/// A random `_…` id not yet present in the map
fn synthetic_id(resources: &ResourceMap) -> String {
    loop {
        let token = RandomState::new().build_hasher().finish();
        let id = format!("_{}", to_base36(token));
        if !resources.contains(&id) {
            return id;
        }
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().map(|&digit| digit as char).collect()
}
