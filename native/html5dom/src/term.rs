//! Elixir Term Conversion Utilities
//!
//! Converts converted documents and their diagnostics to Elixir terms.

use crate::dom::{Document, HtmlDocument, NodeId, NodeKind, SyntaxError, DOCUMENT_NODE};
use rustler::types::atom::nil;
use rustler::{Encoder, Env, NewBinary, Term};

rustler::atoms! {
    element,
    comment,
    cdata,
    message,
    file,
    line,
    column,
    domain,
    code,
    level,
    int1,
    str1,
    str2,
    str3,
}

/// Convert a node to an Elixir term
///
/// - document: list of its top-level nodes, root element included
/// - element: `{:element, name, [{name, value}], children}`
/// - text: binary
/// - CDATA: `{:cdata, binary}`
/// - comment: `{:comment, binary}`
pub fn node_to_term<'a>(env: Env<'a>, doc: &HtmlDocument, node_id: NodeId) -> Term<'a> {
    let term = fold_subtree(
        doc,
        node_id,
        |id, kind| match kind {
            NodeKind::Text => str_to_binary(env, doc.text_content(id).unwrap_or("")),
            NodeKind::CData => (cdata(), str_to_binary(env, doc.text_content(id).unwrap_or(""))).encode(env),
            NodeKind::Comment => (comment(), str_to_binary(env, doc.text_content(id).unwrap_or(""))).encode(env),
            NodeKind::Element | NodeKind::Document => nil().encode(env),
        },
        |id, kind, children| match kind {
            NodeKind::Document => children.encode(env),
            _ => element_to_term(env, doc, id, children),
        },
    );
    term.unwrap_or_else(|| nil().encode(env))
}

fn element_to_term<'a>(env: Env<'a>, doc: &HtmlDocument, node_id: NodeId, children: Vec<Term<'a>>) -> Term<'a> {
    let name_term = str_to_binary(env, doc.node_name(node_id).unwrap_or(""));

    // Build in reverse so prepending keeps source order
    let mut attrs = Term::list_new_empty(env);
    for attr in doc.attributes(node_id).iter().rev() {
        let attr_tuple = (
            str_to_binary(env, doc.attribute_name(attr)),
            str_to_binary(env, doc.attribute_value(attr)),
        );
        attrs = attrs.list_prepend(attr_tuple.encode(env));
    }

    (element(), name_term, attrs, children.encode(env)).encode(env)
}

/// Post-order fold over the subtree at `node_id`.
///
/// `leaf` maps character data nodes; `branch` receives an element or the
/// document node with its children already folded, in document order.
/// Open nodes are kept on an explicit stack.
fn fold_subtree<T>(
    doc: &HtmlDocument,
    node_id: NodeId,
    mut leaf: impl FnMut(NodeId, NodeKind) -> T,
    mut branch: impl FnMut(NodeId, NodeKind, Vec<T>) -> T,
) -> Option<T> {
    struct Open<T> {
        id: NodeId,
        kind: NodeKind,
        next: Option<NodeId>,
        children: Vec<T>,
    }

    let node = doc.get_node(node_id)?;
    if node.is_character_data() {
        return Some(leaf(node_id, node.kind));
    }
    let mut stack = vec![Open {
        id: node_id,
        kind: node.kind,
        next: node.first_child,
        children: Vec::new(),
    }];

    loop {
        let top = stack.last_mut()?;
        match top.next {
            Some(child_id) => {
                let child = doc.get_node(child_id)?;
                top.next = child.next_sibling;
                if child.is_character_data() {
                    top.children.push(leaf(child_id, child.kind));
                } else {
                    stack.push(Open {
                        id: child_id,
                        kind: child.kind,
                        next: child.first_child,
                        children: Vec::new(),
                    });
                }
            }
            None => {
                let done = stack.pop()?;
                let value = branch(done.id, done.kind, done.children);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(value),
                    None => return Some(value),
                }
            }
        }
    }
}

/// Root element of a document, or `nil`
pub fn root_to_term<'a>(env: Env<'a>, doc: &Document) -> Term<'a> {
    let tree = doc.tree();
    match tree.root_element_id() {
        Some(root_id) => node_to_term(env, tree, root_id),
        None => nil().encode(env),
    }
}

/// Every top-level node of a document in order: comments around the root
/// element as well as the root itself
pub fn document_to_term<'a>(env: Env<'a>, doc: &Document) -> Term<'a> {
    node_to_term(env, doc.tree(), DOCUMENT_NODE)
}

/// `{name, public_id | nil, system_id | nil}`, or `nil` without a doctype
pub fn doctype_to_term<'a>(env: Env<'a>, doc: &Document) -> Term<'a> {
    match doc.tree().internal_subset() {
        Some(subset) => (
            str_to_binary(env, subset.name),
            optional_binary(env, subset.external_id),
            optional_binary(env, subset.system_id),
        )
            .encode(env),
        None => nil().encode(env),
    }
}

/// One map per syntax error, in order
pub fn errors_to_term<'a>(env: Env<'a>, errors: &[SyntaxError]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for error in errors.iter().rev() {
        list = list.list_prepend(error_to_term(env, error));
    }
    list
}

fn error_to_term<'a>(env: Env<'a>, error: &SyntaxError) -> Term<'a> {
    let keys = [
        message().encode(env),
        file().encode(env),
        line().encode(env),
        column().encode(env),
        domain().encode(env),
        code().encode(env),
        level().encode(env),
        int1().encode(env),
        str1().encode(env),
        str2().encode(env),
        str3().encode(env),
    ];
    let values = [
        str_to_binary(env, &error.message),
        optional_binary(env, error.file.as_deref()),
        error.line.encode(env),
        error.column.encode(env),
        error.domain.encode(env),
        error.code.encode(env),
        error.level.encode(env),
        error.error_type.encode(env),
        nil().encode(env),
        nil().encode(env),
        nil().encode(env),
    ];
    match Term::map_from_term_arrays(env, &keys, &values) {
        Ok(map) => map,
        Err(_) => nil().encode(env),
    }
}

fn optional_binary<'a>(env: Env<'a>, s: Option<&str>) -> Term<'a> {
    match s {
        Some(s) => str_to_binary(env, s),
        None => nil().encode(env),
    }
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
