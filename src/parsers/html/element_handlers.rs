//! Per-element inlining policies
//!
//! Each handler owns the elements it claims through [`ElementHandler::can_handle`];
//! [`ElementHandlerRegistry`] dispatches to the first handler that claims an
//! element. Handlers never fail: a reference that cannot be resolved is left
//! as is (or made absolute) and reported as a missing resource.

use markup5ever_rcdom::Handle;

use crate::core::Converter;
use crate::parsers::css::{rewrite_css, rewrite_stylesheet, CssContext};
use crate::utils::url::absolute_reference;

use super::assets::{embed_attribute, embed_srcset, set_attribute_preserving};
use super::dom::{create_element, get_node_attr, get_text_content, replace_node, set_text_content};
use super::parser::{parse_link_type, LinkType};
use super::walker::DocumentContext;

pub trait ElementHandler {
    /// Rewrites `node` in place
    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle);

    fn can_handle(&self, element_name: &str) -> bool;
}

/// `<link>`: stylesheets become `<style>` elements, icons become `data:` URLs
pub struct LinkElementHandler;

impl LinkElementHandler {
    fn inline_stylesheet(
        &self,
        converter: &mut Converter,
        document: &DocumentContext,
        node: &Handle,
        href: &str,
    ) {
        let (resolved, key) = converter.lookup_reference(&document.base, href);
        let Some(key) = key else {
            converter.record_missing(&resolved, None);
            if let Some(absolute) = absolute_reference(&resolved, href) {
                set_attribute_preserving(node, "href", &absolute);
            }
            return;
        };

        let css = rewrite_stylesheet(converter, key, &document.base);
        if converter.is_dry_run() {
            return;
        }
        converter.mark_used(key);

        let media = get_node_attr(node, "media");
        let attributes: Vec<(&str, &str)> = match media.as_deref() {
            Some(media) if !media.is_empty() => vec![("media", media)],
            _ => vec![],
        };
        let style = create_element(document.dom, "style", &attributes);
        set_text_content(&style, &css);
        replace_node(node, &style);
    }
}

impl ElementHandler for LinkElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        element_name == "link"
    }

    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        let Some(href) = get_node_attr(node, "href").filter(|href| !href.trim().is_empty()) else {
            return;
        };
        let link_types = parse_link_type(&get_node_attr(node, "rel").unwrap_or_default());

        if link_types.contains(&LinkType::Stylesheet) && !link_types.contains(&LinkType::Alternate)
        {
            self.inline_stylesheet(converter, document, node, href.trim());
        } else if link_types.contains(&LinkType::Icon) {
            embed_attribute(converter, document, node, "href");
        }
    }
}

/// `<style>`: the stylesheet text is rewritten in place
pub struct StyleElementHandler;

impl ElementHandler for StyleElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        element_name == "style"
    }

    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        let css = get_text_content(node);
        let rewritten = rewrite_css(converter, &document.base, &css, CssContext::Stylesheet);

        if !converter.is_dry_run() && rewritten != css {
            set_text_content(node, &rewritten);
        }
    }
}

/// `<img>`, `<audio>`, `<video>`, `<source>` and `<script>`: `src`, plus `srcset` for images
pub struct MediaElementHandler;

impl ElementHandler for MediaElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        matches!(
            element_name,
            "img" | "audio" | "video" | "source" | "script"
        )
    }

    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        embed_attribute(converter, document, node, "src");

        if matches!(super::dom::get_node_name(node), Some("img" | "source")) {
            embed_srcset(converter, document, node);
        }
    }
}

/// Legacy `background` attribute of `<body>`, `<table>`, `<td>` and `<th>`
pub struct BackgroundElementHandler;

impl ElementHandler for BackgroundElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        matches!(element_name, "body" | "table" | "td" | "th")
    }

    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        embed_attribute(converter, document, node, "background");
    }
}

/// `<input type="image">`
pub struct InputElementHandler;

impl ElementHandler for InputElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        element_name == "input"
    }

    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        if get_node_attr(node, "type").is_some_and(|kind| kind.eq_ignore_ascii_case("image")) {
            embed_attribute(converter, document, node, "src");
        }
    }
}

/// Ordered collection of handlers; the first one claiming an element wins
pub struct ElementHandlerRegistry {
    handlers: Vec<Box<dyn ElementHandler>>,
}

impl ElementHandlerRegistry {
    pub fn new() -> Self {
        let mut registry = ElementHandlerRegistry {
            handlers: Vec::new(),
        };

        registry.register(Box::new(LinkElementHandler));
        registry.register(Box::new(StyleElementHandler));
        registry.register(Box::new(MediaElementHandler));
        registry.register(Box::new(BackgroundElementHandler));
        registry.register(Box::new(InputElementHandler));

        registry
    }

    pub fn register(&mut self, handler: Box<dyn ElementHandler>) {
        self.handlers.push(handler);
    }

    pub fn handle_element(
        &self,
        element_name: &str,
        converter: &mut Converter,
        document: &DocumentContext,
        node: &Handle,
    ) {
        for handler in &self.handlers {
            if handler.can_handle(element_name) {
                handler.handle(converter, document, node);
                return;
            }
        }
    }
}

impl Default for ElementHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
