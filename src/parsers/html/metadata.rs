//! Document-level metadata
//!
//! Everything here touches `<head>` as a whole rather than a single element
//! visited by the walker:
//! - `<base>` extraction and removal
//! - canonical link, content security policy and `<meta charset>` insertion
//! - resource hint, refresh and alternate stylesheet removal
//! - the JSON-LD page description built from the archive headers
//! - title and favicon extraction for [`PageData`](crate::core::PageData)

use chrono::DateTime;
use markup5ever_rcdom::{Handle, RcDom};
use serde_json::{json, Map, Value};

use crate::core::Favicon;
use crate::parsers::mhtml::{decode_encoded_words, Headers};

use super::dom::{
    append_child, create_element, find_elements, get_head, get_node_attr, get_text_content,
    insert_after, prepend_child, remove_node, set_node_attr, set_text_content,
};
use super::parser::{parse_link_type, LinkType};
use super::utils::{compose_csp, strip_resource_hints};

/// Removes every `<base>` element, returning the first non-empty `href`
pub fn take_base_href(document: &Handle) -> Option<String> {
    let mut href = None;

    for base_node in find_elements(document, "base") {
        if href.is_none() {
            href = get_node_attr(&base_node, "href").filter(|value| !value.trim().is_empty());
        }
        remove_node(&base_node);
    }

    href
}

pub fn remove_scripts(document: &Handle) {
    for script_node in find_elements(document, "script") {
        remove_node(&script_node);
    }
}

/// Removes `<link rel="alternate stylesheet" title=…>`, only the preferred set is kept
pub fn remove_alternate_stylesheets(document: &Handle) {
    for link_node in find_elements(document, "link") {
        let link_types = parse_link_type(&get_node_attr(&link_node, "rel").unwrap_or_default());
        if link_types.contains(&LinkType::Stylesheet)
            && link_types.contains(&LinkType::Alternate)
            && get_node_attr(&link_node, "title").is_some()
        {
            remove_node(&link_node);
        }
    }
}

/// Appends `<link rel="canonical">` to the head unless the document has one
pub fn ensure_canonical_link(dom: &RcDom, href: &str) {
    let has_canonical = find_elements(&dom.document, "link").iter().any(|link_node| {
        parse_link_type(&get_node_attr(link_node, "rel").unwrap_or_default())
            .contains(&LinkType::Canonical)
    });

    if !has_canonical {
        if let Some(head) = get_head(&dom.document) {
            let link = create_element(dom, "link", &[("rel", "canonical"), ("href", href)]);
            append_child(&head, &link);
        }
    }
}

/// Replaces any content security policy with the one of converted documents
///
/// The policy has to come first in `<head>`, browsers ignore later redefinitions.
pub fn set_content_security_policy(dom: &RcDom, enable_scripts: bool) {
    for meta_node in find_elements(&dom.document, "meta") {
        if get_node_attr(&meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-security-policy")
        {
            remove_node(&meta_node);
        }
    }

    if let Some(head) = get_head(&dom.document) {
        let csp = compose_csp(enable_scripts);
        let meta = create_element(
            dom,
            "meta",
            &[("http-equiv", "Content-Security-Policy"), ("content", &csp)],
        );
        prepend_child(&head, &meta);
    }
}

/// Drops resource hints from `<link rel>`, removing links left without relations
pub fn remove_resource_hints(document: &Handle) {
    for link_node in find_elements(document, "link") {
        let Some(rel) = get_node_attr(&link_node, "rel") else {
            continue;
        };

        match strip_resource_hints(&rel) {
            Some(kept) if kept == rel => {}
            Some(kept) => set_node_attr(&link_node, "rel", Some(kept)),
            None => remove_node(&link_node),
        }
    }
}

pub fn remove_meta_refresh(document: &Handle) {
    for meta_node in find_elements(document, "meta") {
        if get_node_attr(&meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("refresh")
        {
            remove_node(&meta_node);
        }
    }
}

/// Declares UTF-8 as the first child of `<head>`, dropping other declarations
pub fn set_utf8_charset(dom: &RcDom) {
    for meta_node in find_elements(&dom.document, "meta") {
        if get_node_attr(&meta_node, "charset").is_some() {
            remove_node(&meta_node);
        }
    }

    if let Some(head) = get_head(&dom.document) {
        let meta = create_element(dom, "meta", &[("charset", "utf-8")]);
        prepend_child(&head, &meta);
    }
}

/// JSON-LD description of the saved page
pub fn create_page_info(headers: &Headers, url: &str) -> String {
    let mut page_info = Map::new();
    page_info.insert("@context".into(), json!("https://schema.org"));
    page_info.insert("@type".into(), json!("WebPage"));
    page_info.insert("url".into(), json!(url));
    page_info.insert(
        "name".into(),
        json!(decode_encoded_words(headers.get("Subject").unwrap_or_default())),
    );
    if let Some(date) = headers.get("Date") {
        page_info.insert("dateCreated".into(), json!(normalize_date(date)));
    }
    page_info.insert(
        "additionalProperty".into(),
        json!({
            "@type": "PropertyValue",
            "name": "savedBy",
            "value": decode_encoded_words(headers.get("From").unwrap_or_default()),
        }),
    );

    let page_info = serde_json::to_string_pretty(&Value::Object(page_info)).unwrap_or_default();
    // Keeps the payload from closing its own script element
    page_info.replace("</", "<\\/")
}

/// RFC 3339 form of an RFC 2822 date, the raw value when it does not parse
fn normalize_date(date: &str) -> String {
    DateTime::parse_from_rfc2822(date.trim())
        .map(|date| date.to_rfc3339())
        .unwrap_or_else(|_| date.trim().to_string())
}

/// Inserts the JSON-LD page description after the first child of `<head>`
pub fn insert_page_info(dom: &RcDom, headers: &Headers, url: &str) {
    let Some(head) = get_head(&dom.document) else {
        return;
    };

    let script = create_element(dom, "script", &[("type", "application/ld+json")]);
    set_text_content(&script, &create_page_info(headers, url));

    let first_child = head.children.borrow().first().cloned();
    match first_child {
        Some(first_child) => insert_after(&first_child, &script),
        None => append_child(&head, &script),
    }
}

/// Text of the first `<title>` element
pub fn get_title(document: &Handle) -> Option<String> {
    find_elements(document, "title")
        .first()
        .map(get_text_content)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Icons linked from the document, as they are after rewriting
pub fn collect_favicons(document: &Handle) -> Vec<Favicon> {
    find_elements(document, "link")
        .iter()
        .filter(|link_node| {
            parse_link_type(&get_node_attr(link_node, "rel").unwrap_or_default())
                .contains(&LinkType::Icon)
        })
        .filter_map(|link_node| {
            let href = get_node_attr(link_node, "href")?;
            Some(Favicon {
                original_href: get_node_attr(link_node, "data-original-href"),
                href,
                media: get_node_attr(link_node, "media"),
                content_type: get_node_attr(link_node, "type"),
                sizes: get_node_attr(link_node, "sizes"),
            })
        })
        .collect()
}
