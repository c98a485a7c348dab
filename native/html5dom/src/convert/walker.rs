//! Parse tree to DOM tree

use super::attribute::install_attribute;
use super::namespace::qualified_name;
use crate::builder::DomBuilder;
use crate::parse::{ParseElement, ParseNode};

/// Build the DOM node for `node`, or nothing for a document node
pub fn walk<B: DomBuilder>(builder: &mut B, node: &ParseNode) -> Option<B::Node> {
    match node {
        ParseNode::Element(element) | ParseNode::Template(element) => {
            Some(build_element(builder, element))
        }
        other => build_leaf(builder, other),
    }
}

/// Build an element with its attributes and subtree, all in source order
///
/// Open elements are kept on an explicit stack, so nesting depth is bounded
/// only by memory.
pub fn build_element<B: DomBuilder>(builder: &mut B, element: &ParseElement) -> B::Node {
    let root = open_element(builder, element);
    let mut stack = vec![(root.clone(), element.children.iter())];

    while let Some((parent, children)) = stack.last_mut() {
        let Some(child) = children.next() else {
            stack.pop();
            continue;
        };
        match child {
            ParseNode::Element(el) | ParseNode::Template(el) => {
                let node = open_element(builder, el);
                builder.append_child(parent, &node);
                stack.push((node, el.children.iter()));
            }
            leaf => {
                if let Some(node) = build_leaf(builder, leaf) {
                    builder.append_child(parent, &node);
                }
            }
        }
    }
    root
}

/// Create an element and install its attributes
fn open_element<B: DomBuilder>(builder: &mut B, element: &ParseElement) -> B::Node {
    let node = builder.create_element(&element.name);
    log::trace!(target: "html5dom::convert", "element {} with {} attributes", element.name, element.attributes.len());

    for attr in &element.attributes {
        let name = qualified_name(attr);
        install_attribute(builder, &node, &name, &attr.value);
    }
    node
}

fn build_leaf<B: DomBuilder>(builder: &mut B, node: &ParseNode) -> Option<B::Node> {
    match node {
        ParseNode::Document(_) | ParseNode::Element(_) | ParseNode::Template(_) => None,
        ParseNode::Text(text) | ParseNode::Whitespace(text) => Some(builder.create_text(text)),
        ParseNode::CData(data) => Some(builder.create_cdata(data)),
        ParseNode::Comment(text) => Some(builder.create_comment(text)),
    }
}
