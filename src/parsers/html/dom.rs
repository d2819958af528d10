//! Basic DOM operations over `markup5ever_rcdom` trees

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::tree_builder::create_element as create_dom_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

/// Parses an HTML string into a DOM
pub fn html_to_dom(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Finds nodes matching a path of element names, e.g. `["html", "head", "title"]`
pub fn find_nodes(node: &Handle, node_names: Vec<&str>) -> Vec<Handle> {
    assert!(!node_names.is_empty());

    let mut found_nodes = Vec::new();
    let node_name = node_names[0];

    if node_names.len() == 1 {
        if let NodeData::Element { ref name, .. } = node.data {
            if &*name.local == node_name {
                found_nodes.push(node.clone());
            }
        }

        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    } else if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            let mut rest = node_names;
            rest.remove(0);
            found_nodes.append(&mut find_nodes(node, rest));
        } else {
            for child_node in node.children.borrow().iter() {
                found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
            }
        }
    } else {
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    }

    found_nodes
}

/// All elements named `element_name` anywhere below `node`, in document order
pub fn find_elements(node: &Handle, element_name: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_elements(node, element_name, &mut found);
    found
}

fn collect_elements(node: &Handle, element_name: &str, found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if get_node_name(child) == Some(element_name) {
            found.push(child.clone());
        }
        collect_elements(child, element_name, found);
    }
}

pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    children
        .iter()
        .find(|child| get_node_name(child) == Some(node_name))
        .cloned()
}

/// The `<head>` element of a parsed document
pub fn get_head(document: &Handle) -> Option<Handle> {
    get_child_node_by_name(document, "html").and_then(|html| get_child_node_by_name(&html, "head"))
}

pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// Sets an attribute, or removes it when `attr_value` is `None`
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = &attr_value {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value);
                } else {
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    }
}

/// Creates a detached HTML element owned by `dom`
pub fn create_element(dom: &RcDom, element_name: &str, attributes: &[(&str, &str)]) -> Handle {
    create_dom_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from(element_name)),
        attributes
            .iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*name)),
                value: format_tendril!("{}", value),
            })
            .collect(),
    )
}

pub fn create_text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    })
}

pub fn append_child(parent: &Handle, child: &Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

pub fn prepend_child(parent: &Handle, child: &Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, child.clone());
}

/// Inserts `node` right after `reference` among its siblings
pub fn insert_after(reference: &Handle, node: &Handle) {
    if let Some(parent) = get_parent_node(reference) {
        let mut children = parent.children.borrow_mut();
        let position = children
            .iter()
            .position(|child| Rc::ptr_eq(child, reference))
            .map_or(children.len(), |index| index + 1);
        node.parent.set(Some(Rc::downgrade(&parent)));
        children.insert(position, node.clone());
    }
}

/// Detaches a node from its parent
pub fn remove_node(node: &Handle) {
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
}

/// Puts `replacement` where `node` was, detaching `node`
pub fn replace_node(node: &Handle, replacement: &Handle) {
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) {
        let mut children = parent.children.borrow_mut();
        if let Some(position) = children.iter().position(|child| Rc::ptr_eq(child, node)) {
            replacement.parent.set(Some(Rc::downgrade(&parent)));
            children[position] = replacement.clone();
        }
    }
}

/// Concatenated text of every text node below `node`
pub fn get_text_content(node: &Handle) -> String {
    let mut text = String::new();
    for child in node.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child.data {
            text.push_str(&contents.borrow());
        } else {
            text.push_str(&get_text_content(child));
        }
    }
    text
}

/// Replaces the children of `node` with a single text node
pub fn set_text_content(node: &Handle, text: &str) {
    let first_text = node
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Text { .. }))
        .cloned();

    match first_text {
        Some(text_node) => {
            if let NodeData::Text { ref contents } = text_node.data {
                let mut tendril = contents.borrow_mut();
                tendril.clear();
                tendril.push_slice(text);
            }
            node.children
                .borrow_mut()
                .retain(|child| Rc::ptr_eq(child, &text_node));
        }
        None => {
            node.children.borrow_mut().clear();
            append_child(node, &create_text_node(text));
        }
    }
}
