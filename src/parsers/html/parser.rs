//! Parsing of `rel` and `srcset` attribute values
//!
//! ```rust
//! use mhtml_to_html::parsers::html::parser::{parse_link_type, parse_srcset, LinkType};
//!
//! let link_types = parse_link_type("alternate stylesheet");
//! assert_eq!(link_types, vec![LinkType::Alternate, LinkType::Stylesheet]);
//!
//! let srcset_items = parse_srcset("small.jpg 480w, large.jpg 800w");
//! assert_eq!(srcset_items.len(), 2);
//! ```

use super::utils::WHITESPACES;

/// Link relations the converter acts on
#[derive(Debug, PartialEq, Eq)]
pub enum LinkType {
    Alternate,
    Canonical,
    /// Any relation containing "icon" (`icon`, `apple-touch-icon`, `mask-icon`, ...)
    Icon,
    Stylesheet,
}

/// One candidate of a `srcset` attribute
#[derive(Debug, PartialEq, Eq)]
pub struct SrcSetItem<'a> {
    pub path: &'a str,
    /// Width (`480w`) or density (`2x`) descriptor, empty when absent
    pub descriptor: &'a str,
}

/// Parses a `rel` attribute value; unknown relations are ignored
pub fn parse_link_type(link_attr_rel_value: &str) -> Vec<LinkType> {
    let mut types: Vec<LinkType> = vec![];

    for link_attr_rel_type in link_attr_rel_value.split_whitespace() {
        let link_attr_rel_type = link_attr_rel_type.to_ascii_lowercase();

        let link_type = if link_attr_rel_type == "alternate" {
            LinkType::Alternate
        } else if link_attr_rel_type == "canonical" {
            LinkType::Canonical
        } else if link_attr_rel_type == "stylesheet" {
            LinkType::Stylesheet
        } else if link_attr_rel_type.contains("icon") {
            LinkType::Icon
        } else {
            continue;
        };

        if !types.contains(&link_type) {
            types.push(link_type);
        }
    }

    types
}

/// Parses a `srcset` attribute into its candidates
///
/// Commas inside a URL (as found in `data:` URLs) stay part of the path.
pub fn parse_srcset(srcset: &str) -> Vec<SrcSetItem<'_>> {
    let mut srcset_items: Vec<SrcSetItem<'_>> = vec![];

    let mut partials: Vec<&str> = srcset.split(WHITESPACES).collect();
    let mut path: Option<&str> = None;
    let mut descriptor: Option<&str> = None;
    let mut i = 0;

    while i < partials.len() {
        let partial = partials[i];
        i += 1;

        if partial.is_empty() {
            continue;
        }

        if let Some(stripped) = partial.strip_suffix(',') {
            if path.is_none() {
                path = Some(stripped);
                descriptor = Some("");
            } else {
                descriptor = Some(stripped);
            }
        } else if path.is_none() {
            path = Some(partial);
        } else {
            // "2x,next.png" when candidates are separated by a bare comma
            match partial.split_once(',') {
                Some((first, rest)) if first.ends_with(['x', 'w']) => {
                    descriptor = Some(first);
                    if !rest.is_empty() {
                        partials.insert(i, rest);
                    }
                }
                _ => descriptor = Some(partial),
            }
        }

        if let (Some(p), Some(d)) = (path, descriptor) {
            srcset_items.push(SrcSetItem {
                path: p,
                descriptor: d,
            });
            path = None;
            descriptor = None;
        }
    }

    if let Some(p) = path {
        srcset_items.push(SrcSetItem {
            path: p,
            descriptor: descriptor.unwrap_or_default(),
        });
    }

    srcset_items
}

/// Serializes candidates back into a `srcset` value
pub fn serialize_srcset(items: &[(String, &str)]) -> String {
    items
        .iter()
        .map(|(path, descriptor)| {
            if descriptor.is_empty() {
                path.clone()
            } else {
                format!("{} {}", path, descriptor)
            }
        })
        .collect::<Vec<String>>()
        .join(", ")
}
