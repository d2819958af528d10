//! # Parsers
//!
//! - `mhtml` - MIME demultiplexing of the archive into resources
//! - `html` - DOM operations and the element rewriting pass
//! - `css` - stylesheet and inline style rewriting
//! - `js` - event handler attribute names

pub mod css;
pub mod html;
pub mod js;
pub mod mhtml;

// Re-export commonly used items for convenience
pub use css::{rewrite_css, rewrite_stylesheet, CssContext};
pub use html::{get_title, html_to_dom, serialize_document, walk};
pub use js::attr_is_event_handler;
pub use mhtml::{parse, Headers, Mhtml, Resource, ResourceData, ResourceMap, TransferEncoding};
