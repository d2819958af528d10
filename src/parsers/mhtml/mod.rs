//! MHTML archive parsing
//!
//! - `scanner`: byte cursor, line extraction and transfer decoding
//! - `headers`: MIME header blocks and encoded-words
//! - `parser`: the multipart state machine
//! - `resource`: resources and the maps addressing them
//! - `charset`: charset normalization of textual parts

pub mod charset;
pub mod headers;
pub mod parser;
pub mod resource;
pub mod scanner;

pub use charset::{get_charset, replace_charset};
pub use headers::{decode_encoded_words, Headers};
pub use parser::{build_resource, parse};
pub use resource::{Mhtml, Resource, ResourceData, ResourceKey, ResourceMap, TransferEncoding};
