//! Handlers for elements that embed whole documents or navigate
//!
//! - `FrameElementHandler`: `<iframe>`, `<frame>`, `<embed>` and `<object>`
//! - `AnchorElementHandler`: `<a>` and `<area>`

use markup5ever_rcdom::Handle;
use tracing::warn;

use crate::core::Converter;
use crate::utils::url::{
    absolute_reference, create_html_data_url, is_data_url, normalize_url, resolve_path,
    split_fragment,
};

use super::assets::set_attribute_preserving;
use super::dom::{get_node_attr, get_node_name, set_node_attr};
use super::element_handlers::ElementHandler;
use super::walker::DocumentContext;

/// Embedded content
///
/// `<embed>`/`<object>` targets and non-document frame targets are inlined as
/// `data:` URLs. Document targets are converted recursively: an `<iframe>`
/// receives the result as `srcdoc` (its `src` removed), a `<frame>` as a
/// `data:text/html,` URL. `cid:` references resolve through Content-IDs.
pub struct FrameElementHandler;

impl ElementHandler for FrameElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        matches!(element_name, "iframe" | "frame" | "embed" | "object")
    }

    fn handle(&self, converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        let element_name = get_node_name(node).unwrap_or_default();
        let attr_name = if element_name == "object" {
            "data"
        } else {
            "src"
        };

        let Some(reference) = get_node_attr(node, attr_name) else {
            return;
        };
        let reference = reference.trim();
        if reference.is_empty() || is_data_url(reference) {
            return;
        }

        let (resolved, key) = converter.lookup_reference(&document.base, reference);
        let Some(key) = key else {
            converter.record_missing(&resolved, None);
            if let Some(absolute) = absolute_reference(&resolved, reference) {
                set_attribute_preserving(node, attr_name, &absolute);
            }
            return;
        };

        let is_document = converter
            .resource(key)
            .is_some_and(|resource| resource.is_document());

        if !is_document || matches!(element_name, "embed" | "object") {
            if converter.is_dry_run() {
                return;
            }
            converter.mark_used(key);
            if let Some(data_url) = converter.resource(key).map(|resource| resource.to_data_url()) {
                set_attribute_preserving(node, attr_name, &data_url);
            }
            return;
        }

        match converter.render_frame(key, &document.base) {
            Ok(html) => {
                if converter.is_dry_run() {
                    return;
                }
                converter.mark_used(key);

                if element_name == "iframe" {
                    set_node_attr(node, "data-original-src", Some(reference.to_string()));
                    set_node_attr(node, "src", None);
                    set_node_attr(node, "srcdoc", Some(html));
                } else {
                    set_attribute_preserving(node, attr_name, &create_html_data_url(&html));
                }
            }
            Err(err) => warn!(%err, frame = %reference, "frame left untouched"),
        }
    }
}

/// Hyperlinks become absolute, links into the current document become fragments
///
/// The `ping` attribute is always removed.
pub struct AnchorElementHandler;

impl ElementHandler for AnchorElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        matches!(element_name, "a" | "area")
    }

    fn handle(&self, _converter: &mut Converter, document: &DocumentContext, node: &Handle) {
        set_node_attr(node, "ping", None);

        let Some(href) = get_node_attr(node, "href") else {
            return;
        };
        let href = href.trim();
        if href.is_empty() {
            return;
        }

        let resolved = resolve_path(href, &document.base);
        let same_document_fragment = split_fragment(&resolved).and_then(|(url, fragment)| {
            match fragment {
                Some(fragment) if !fragment.is_empty() && url == normalize_url(&document.base) => {
                    Some(format!("#{}", fragment))
                }
                _ => None,
            }
        });

        match same_document_fragment {
            Some(fragment) => set_attribute_preserving(node, "href", &fragment),
            None => set_attribute_preserving(node, "href", &resolved),
        }
    }
}
