//! Entry point of the element rewriting pass

use markup5ever_rcdom::{Handle, RcDom};

use crate::core::Converter;

use super::dom_walker::DomWalker;

/// The document currently being rewritten
pub struct DocumentContext<'d> {
    /// Owner of the tree, used to create replacement elements
    pub dom: &'d RcDom,
    /// Base URL relative references resolve against
    pub base: String,
    /// Resource id of the document
    pub id: String,
}

/// Rewrites every element below `node`, inlining what the archive provides
pub fn walk(converter: &mut Converter, document: &DocumentContext, node: &Handle) {
    let walker = DomWalker::new();

    walker.walk(converter, document, node);
}
