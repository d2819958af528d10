//! HTML parsing and rewriting
//!
//! - `dom`: DOM operations over `markup5ever_rcdom` handles
//! - `parser`: `rel` and `srcset` attribute parsing
//! - `utils`: content security policy and resource hint helpers
//! - `metadata`: document-level steps run before the walk
//! - `serializer`: DOM to HTML text
//! - `assets`: attribute inlining
//! - `element_handlers`, `complex_element_handlers`: per-element policies
//! - `dom_walker`, `walker`: breadth-first traversal

pub mod assets;
pub mod complex_element_handlers;
pub mod dom;
pub mod dom_walker;
pub mod element_handlers;
pub mod metadata;
pub mod parser;
pub mod serializer;
pub mod utils;
pub mod walker;

pub use assets::{embed_attribute, embed_reference, embed_srcset, set_attribute_preserving};
pub use dom::{
    append_child, create_element, create_text_node, find_elements, find_nodes,
    get_child_node_by_name, get_head, get_node_attr, get_node_name, get_parent_node,
    get_text_content, html_to_dom, insert_after, prepend_child, remove_node, replace_node,
    set_node_attr, set_text_content,
};
pub use metadata::{collect_favicons, create_page_info, get_title};
pub use parser::{parse_link_type, parse_srcset, serialize_srcset, LinkType, SrcSetItem};
pub use serializer::serialize_document;
pub use utils::{compose_csp, strip_resource_hints, WHITESPACES};
pub use walker::{walk, DocumentContext};
