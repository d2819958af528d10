//! Byte cursor over a raw MIME stream
//!
//! The archive is never decoded as a whole: lines are pulled out one at a
//! time, transfer-decoded, and appended to the part currently being read.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::{DecodePaddingMode, Engine};
use memchr::{memchr, memmem};

const LF: u8 = b'\n';
const EQUALS_SIGN: u8 = b'=';

/// Standard alphabet, padding optional (folded archives often lose it)
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub struct Scanner<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Scanner { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Whether anything but a lone trailing byte is left to read
    pub fn has_more(&self) -> bool {
        self.position + 1 < self.data.len()
    }

    /// Returns the bytes up to and including the next LF, advancing past them
    ///
    /// The last line of the buffer is returned as is when it lacks a terminator.
    pub fn get_line(&mut self) -> &'a [u8] {
        let rest = &self.data[self.position..];
        let length = memchr(LF, rest).map_or(rest.len(), |index| index + 1);
        self.position += length;
        &rest[..length]
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        let end = end.min(self.data.len());
        &self.data[start.min(end)..end]
    }
}

/// True iff the line is exactly CRLF or exactly LF
pub fn is_line_feed(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

pub fn ends_with_crlf(line: &[u8]) -> bool {
    line.ends_with(b"\r\n")
}

pub fn ends_with_lf(line: &[u8]) -> bool {
    line.ends_with(b"\n")
}

/// True iff the line begins with the `--` delimiter prefix
pub fn starts_with_boundary(line: &[u8]) -> bool {
    line.starts_with(b"--")
}

/// Drops one trailing CRLF or LF
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    if ends_with_crlf(line) {
        &line[..line.len() - 2]
    } else if ends_with_lf(line) {
        &line[..line.len() - 1]
    } else {
        line
    }
}

/// Byte offset of the first occurrence of `needle` within `haystack`
pub fn index_of(haystack: &[u8], needle: &str) -> Option<usize> {
    memmem::find(haystack, needle.as_bytes())
}

/// Removes a quoted-printable soft line break (`=` + line ending) from a raw line
///
/// Returns the line and whether a soft break was found. A line without one keeps
/// its hard line break.
pub fn strip_soft_line_break(line: &[u8]) -> (&[u8], bool) {
    let content = strip_line_ending(line);
    match content.split_last() {
        Some((&EQUALS_SIGN, rest)) => (rest, true),
        _ => (line, false),
    }
}

/// Decodes `=XX` escapes, passing every other byte through
pub fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] == EQUALS_SIGN && i + 2 < input.len() {
            if let (Some(high), Some(low)) = (hex_value(input[i + 1]), hex_value(input[i + 2])) {
                output.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        output.push(input[i]);
        i += 1;
    }

    output
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Decodes a base64 payload, ignoring any whitespace left by line folding
///
/// Undecodable input yields `None` so the caller can keep the raw bytes.
pub fn decode_base64(input: &[u8]) -> Option<Vec<u8>> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    BASE64_LENIENT.decode(compact).ok()
}
