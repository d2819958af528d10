//! Inlining of resources referenced from element attributes
//!
//! Every attribute rewrite keeps the previous value in `data-original-<attr>`,
//! unless that value was already a `data:` URL.

use markup5ever_rcdom::Handle;

use crate::core::Converter;
use crate::parsers::mhtml::TransferEncoding;
use crate::utils::url::{absolute_reference, is_data_url};

use super::dom::{get_node_attr, set_node_attr};
use super::parser::{parse_srcset, serialize_srcset};
use super::walker::DocumentContext;

/// Sets `attr_name`, keeping the value it replaces in `data-original-<attr_name>`
pub fn set_attribute_preserving(node: &Handle, attr_name: &str, attr_value: &str) {
    if let Some(original) = get_node_attr(node, attr_name) {
        if original == attr_value {
            return;
        }
        if !is_data_url(&original) {
            set_node_attr(node, &format!("data-original-{}", attr_name), Some(original));
        }
    }
    set_node_attr(node, attr_name, Some(attr_value.to_string()));
}

/// New value for a reference: a `data:` URL on a hit, the absolute URL on a miss
///
/// Returns `None` when the reference should be left as is, which is always the
/// case for hits during a dry run.
pub fn embed_reference(
    converter: &mut Converter,
    base: &str,
    reference: &str,
    transfer_encoding: Option<TransferEncoding>,
) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || is_data_url(reference) {
        return None;
    }

    let (resolved, key) = converter.lookup_reference(base, reference);
    match key {
        Some(key) => {
            if converter.is_dry_run() {
                return None;
            }
            converter.mark_used(key);
            converter.resource(key).map(|resource| resource.to_data_url())
        }
        None => {
            converter.record_missing(&resolved, transfer_encoding);
            absolute_reference(&resolved, reference)
        }
    }
}

/// Inlines the resource referenced by `attr_name`
pub fn embed_attribute(
    converter: &mut Converter,
    document: &DocumentContext,
    node: &Handle,
    attr_name: &str,
) {
    let Some(reference) = get_node_attr(node, attr_name) else {
        return;
    };

    if let Some(value) = embed_reference(
        converter,
        &document.base,
        &reference,
        Some(TransferEncoding::Base64),
    ) {
        set_attribute_preserving(node, attr_name, &value);
    }
}

/// Inlines every candidate of a `srcset` attribute independently
pub fn embed_srcset(converter: &mut Converter, document: &DocumentContext, node: &Handle) {
    let Some(srcset) = get_node_attr(node, "srcset") else {
        return;
    };

    let srcset_items = parse_srcset(&srcset);
    if srcset_items.is_empty() {
        return;
    }

    let mut changed = false;
    let mut rewritten: Vec<(String, &str)> = Vec::with_capacity(srcset_items.len());
    for item in &srcset_items {
        match embed_reference(
            converter,
            &document.base,
            item.path,
            Some(TransferEncoding::Base64),
        ) {
            Some(value) => {
                changed = true;
                rewritten.push((value, item.descriptor));
            }
            None => rewritten.push((item.path.to_string(), item.descriptor)),
        }
    }

    if changed {
        set_attribute_preserving(node, "srcset", &serialize_srcset(&rewritten));
    }
}
