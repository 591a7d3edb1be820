use crate::parser::NodeRef;
use std::collections::HashMap;

/// DOM-navigation helpers implemented on [`NodeRef`].
///
/// This trait is automatically in scope when you import from
/// [`crate::parser`].
pub trait NodeExt {
    /// Return the local tag name of this node if it is an element (e.g.
    /// `"div"`, `"a"`), or `None` for text / comment / document nodes.
    fn element_name(&self) -> Option<&str>;

    /// Look up an attribute by name and return its value, or `None` if the
    /// attribute is absent or this is not an element node.
    fn attr_value(&self, name: &str) -> Option<String>;

    /// Concatenate the values of the node's direct child text nodes.  Text
    /// inside nested elements is not included.
    fn immediate_text(&self) -> String;

    /// Serialise the *children* of this node to an HTML string (the node's
    /// own open/close tags are **not** included).
    fn inner_html(&self) -> String;

    /// Walk forward through siblings until an element node is found, or
    /// return `None` if the end of the sibling list is reached.
    fn next_element_sibling(&self) -> Option<NodeRef>;

    /// Whether the element is hidden by markup alone: a `hidden`
    /// attribute, or an inline style with `display: none` or
    /// `visibility: hidden`.
    fn is_hidden(&self) -> bool;
}

impl NodeExt for NodeRef {
    fn element_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.local.as_ref())
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).map(|v| v.to_string()))
    }

    fn immediate_text(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            if let Some(text) = child.as_text() {
                out.push_str(text.borrow().as_str());
            }
        }
        out
    }

    fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            out.push_str(&child.to_string());
        }
        out
    }

    fn next_element_sibling(&self) -> Option<NodeRef> {
        let mut sib = self.next_sibling();
        while let Some(node) = sib {
            if node.as_element().is_some() {
                return Some(node);
            }
            sib = node.next_sibling();
        }
        None
    }

    fn is_hidden(&self) -> bool {
        if self.as_element().is_none() {
            return false;
        }
        if self.attr_value("hidden").is_some() {
            return true;
        }
        if let Some(style) = self.attr_value("style") {
            let style_attrs = parse_style_attrs(style.as_str());
            let has = |prop: &str, expected: &str| {
                style_attrs
                    .get(prop)
                    .is_some_and(|v| v.eq_ignore_ascii_case(expected))
            };
            if has("display", "none") || has("visibility", "hidden") {
                return true;
            }
        }
        false
    }
}

/// Split an inline `style` attribute into lowercase property names and
/// values, with any `!important` marker dropped.
fn parse_style_attrs(style: &str) -> HashMap<String, &str> {
    let mut attrs = HashMap::new();
    for declaration in style.split(';') {
        if let Some((prop, value)) = declaration.split_once(':') {
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(value);
            attrs.insert(prop.trim().to_ascii_lowercase(), value);
        }
    }
    attrs
}

/// Copy `node` and its whole subtree into a new, detached tree.
///
/// Attribute maps and text are copied; `<template>` contents stay shared
/// with the source.
pub fn deep_clone(node: &NodeRef) -> NodeRef {
    let root = NodeRef::new(node.data().clone());
    let mut stack = vec![(node.clone(), root.clone())];
    while let Some((source, copy)) = stack.pop() {
        for child in source.children() {
            let child_copy = NodeRef::new(child.data().clone());
            copy.append(child_copy.clone());
            stack.push((child, child_copy));
        }
    }
    root
}
