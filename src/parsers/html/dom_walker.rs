//! Breadth-first DOM traversal
//!
//! Every element goes through its registered handler, then through the
//! attribute passes shared by all elements:
//! - inline `style` rewritten as a CSS declaration list
//! - `integrity` removed, since inlined content no longer matches the hash
//! - event handler attributes removed unless scripts are enabled
//!
//! The traversal is queue-based, so deeply nested documents do not grow the stack.

use std::collections::VecDeque;

use markup5ever_rcdom::{Handle, NodeData};

use crate::core::Converter;
use crate::parsers::css::{rewrite_css, CssContext};
use crate::parsers::js::attr_is_event_handler;

use super::complex_element_handlers::{AnchorElementHandler, FrameElementHandler};
use super::dom::{get_node_attr, set_node_attr};
use super::element_handlers::ElementHandlerRegistry;
use super::walker::DocumentContext;

pub struct DomWalker {
    element_registry: ElementHandlerRegistry,
}

impl DomWalker {
    pub fn new() -> Self {
        let mut walker = DomWalker {
            element_registry: ElementHandlerRegistry::new(),
        };

        walker.register_complex_handlers();

        walker
    }

    fn register_complex_handlers(&mut self) {
        self.element_registry
            .register(Box::new(FrameElementHandler));
        self.element_registry
            .register(Box::new(AnchorElementHandler));
    }

    /// Visits every element below `root` in breadth-first order
    pub fn walk(&self, converter: &mut Converter, document: &DocumentContext, root: &Handle) {
        let mut queue: VecDeque<Handle> = VecDeque::from([root.clone()]);

        while let Some(node) = queue.pop_front() {
            // Handlers may replace children, so iterate over a snapshot
            let children: Vec<Handle> = node.children.borrow().clone();

            for child in children {
                if let NodeData::Element { ref name, .. } = child.data {
                    let element_name = name.local.to_string();

                    self.element_registry
                        .handle_element(&element_name, converter, document, &child);
                    self.process_style_attribute(converter, document, &child);
                    set_node_attr(&child, "integrity", None);
                    self.process_js_attributes(converter, &child);
                }

                queue.push_back(child);
            }
        }
    }

    fn process_style_attribute(
        &self,
        converter: &mut Converter,
        document: &DocumentContext,
        node: &Handle,
    ) {
        let Some(style) = get_node_attr(node, "style") else {
            return;
        };
        if style.trim().is_empty() {
            return;
        }

        let rewritten = rewrite_css(converter, &document.base, &style, CssContext::DeclarationList);
        if !converter.is_dry_run() && rewritten != style {
            set_node_attr(node, "style", Some(rewritten));
        }
    }

    fn process_js_attributes(&self, converter: &Converter, node: &Handle) {
        if converter.options().enable_scripts {
            return;
        }

        if let NodeData::Element { ref attrs, .. } = node.data {
            attrs
                .borrow_mut()
                .retain(|attr| !attr_is_event_handler(&attr.name.local));
        }
    }
}

impl Default for DomWalker {
    fn default() -> Self {
        Self::new()
    }
}
