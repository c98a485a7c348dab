//! HTML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names, values and character data
//! - Per-element attribute runs in a shared attribute arena

use super::namespace::{split_qname, NamespaceTable};
use super::node::{DomAttribute, DomNode, NodeId, NodeKind, DOCUMENT_NODE};
use super::strings::StringPool;
use super::syntax_error::SyntaxError;

/// DOCTYPE of a document, stored as interned string IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InternalSubset {
    name_id: u32,
    external_id: Option<u32>,
    system_id: Option<u32>,
}

/// Borrowed view of a document's internal subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentType<'a> {
    pub name: &'a str,
    /// Public identifier
    pub external_id: Option<&'a str>,
    /// System identifier
    pub system_id: Option<&'a str>,
}

/// An HTML document stored in arena format
pub struct HtmlDocument {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<DomNode>,
    /// Arena of attributes
    attributes: Vec<DomAttribute>,
    /// Interned strings
    pub strings: StringPool,
    /// Prefixes understood by the colon-aware attribute setter
    namespaces: NamespaceTable,
    internal_subset: Option<InternalSubset>,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl HtmlDocument {
    /// Create a document, taking the DTD system identifier (`uri`) first and
    /// the public identifier (`external_id`) second.
    ///
    /// An internal subset named `html` is created only when at least one
    /// identifier is given.
    pub fn new(uri: Option<&str>, external_id: Option<&str>) -> Self {
        let mut strings = StringPool::new();
        let namespaces = NamespaceTable::new(&mut strings);
        let mut nodes = Vec::with_capacity(256);
        nodes.push(DomNode::document());

        let mut doc = HtmlDocument {
            nodes,
            attributes: Vec::with_capacity(128),
            strings,
            namespaces,
            internal_subset: None,
            root_element: None,
        };

        if uri.is_some() || external_id.is_some() {
            doc.create_internal_subset("html", external_id, uri);
        }

        doc
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    fn push_node(&mut self, node: DomNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Create a detached element. No namespace is bound to the element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let name_id = self.strings.intern(name);
        self.push_node(DomNode::element(name_id))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.strings.intern(text);
        self.push_node(DomNode::text(id))
    }

    /// Create a detached CDATA node holding `data` in full, embedded NULs
    /// included
    pub fn create_cdata(&mut self, data: &str) -> NodeId {
        let id = self.strings.intern(data);
        self.push_node(DomNode::cdata(id))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        let id = self.strings.intern(text);
        self.push_node(DomNode::comment(id))
    }

    /// Append a detached node as the last child of `parent`.
    ///
    /// Returns false when either node does not exist, `child` already has a
    /// parent, or `parent` cannot hold children.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> bool {
        if parent_id == child_id || child_id == DOCUMENT_NODE {
            return false;
        }
        match (self.get_node(parent_id), self.get_node(child_id)) {
            (Some(parent), Some(child)) => {
                if !matches!(parent.kind, NodeKind::Document | NodeKind::Element)
                    || child.parent.is_some()
                {
                    return false;
                }
            }
            _ => return false,
        }

        self.link_child(parent_id, child_id);
        true
    }

    /// Append `root` to the document and make it the root element,
    /// replacing any existing root element.
    pub fn set_root_element(&mut self, root: NodeId) -> bool {
        if !self.get_node(root).is_some_and(DomNode::is_element) {
            return false;
        }
        if let Some(old) = self.root_element {
            if old == root {
                return true;
            }
            self.unlink(old);
        }
        if !self.append_child(DOCUMENT_NODE, root) {
            return false;
        }
        self.root_element = Some(root);
        true
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
        self.nodes[child_id as usize].parent = Some(parent_id);
    }

    /// Detach a node from its parent, keeping its subtree
    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id as usize];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = next,
            None => self.nodes[parent as usize].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next as usize].prev_sibling = prev,
            None => self.nodes[parent as usize].last_child = prev,
        }

        let node = &mut self.nodes[id as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Bind a namespace prefix for the colon-aware attribute setter
    pub fn declare_namespace(&mut self, prefix: &str, uri: &str) {
        let prefix_id = self.strings.intern(prefix);
        let uri_id = self.strings.intern(uri);
        self.namespaces.declare(prefix_id, uri_id);
    }

    /// Set an attribute, interpreting `prefix:local` names.
    ///
    /// When `prefix` is bound (`xml` and `xmlns` always are) the attribute is
    /// stored as `local` in that namespace; otherwise the name is stored
    /// literally. An existing attribute with the same name and namespace has
    /// its value replaced in place. Returns the attribute's index on the
    /// element, or None if `element` is not an element.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Option<usize> {
        if !self.get_node(element)?.is_element() {
            return None;
        }

        let value_id = self.strings.intern(value);
        let (prefix, local) = split_qname(name);
        let binding = prefix.and_then(|p| {
            let prefix_id = self.strings.lookup(p)?;
            self.namespaces.resolve(prefix_id).map(|uri_id| (prefix_id, uri_id))
        });

        let attr = match binding {
            Some((prefix_id, namespace_id)) => DomAttribute {
                name_id: self.strings.intern(local),
                prefix_id,
                namespace_id,
                value_id,
            },
            None => DomAttribute::new(self.strings.intern(name), value_id),
        };

        let existing = self
            .attributes(element)
            .iter()
            .position(|a| a.name_id == attr.name_id && a.namespace_id == attr.namespace_id);
        if let Some(index) = existing {
            let start = self.nodes[element as usize].attr_start as usize;
            self.attributes[start + index] = attr;
            return Some(index);
        }

        Some(self.push_attribute(element, attr))
    }

    /// Append an attribute to an element's run, moving the run to the tail
    /// of the arena first if another element's attributes follow it.
    fn push_attribute(&mut self, element: NodeId, attr: DomAttribute) -> usize {
        let (start, count) = {
            let node = &self.nodes[element as usize];
            (node.attr_start as usize, node.attr_count as usize)
        };

        if start + count != self.attributes.len() {
            let new_start = self.attributes.len();
            self.attributes.extend_from_within(start..start + count);
            self.nodes[element as usize].attr_start = new_start as u32;
        }

        self.attributes.push(attr);
        self.nodes[element as usize].attr_count += 1;
        count
    }

    /// Index of the attribute whose stored name is exactly `name`.
    ///
    /// Namespaced attributes are matched by their local name only.
    pub fn attribute_index(&self, element: NodeId, name: &str) -> Option<usize> {
        let name_id = self.strings.lookup(name)?;
        self.attributes(element).iter().position(|a| a.name_id == name_id)
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.attribute_index(element, name).is_some()
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        let index = self.attribute_index(element, name)?;
        self.strings.get(self.attributes(element)[index].value_id)
    }

    /// Remove the attribute named `name`, keeping the order of the others
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> bool {
        let Some(index) = self.attribute_index(element, name) else {
            return false;
        };
        let (start, count) = {
            let node = &self.nodes[element as usize];
            (node.attr_start as usize, node.attr_count as usize)
        };

        self.attributes[start + index..start + count].rotate_left(1);
        self.nodes[element as usize].attr_count -= 1;
        if start + count == self.attributes.len() {
            self.attributes.truncate(start + count - 1);
        }
        true
    }

    /// Give the attribute at `index` the literal name `name`, dropping any
    /// prefix and namespace binding. The value and position are kept.
    pub fn rename_attribute(&mut self, element: NodeId, index: usize, name: &str) -> bool {
        let Some(node) = self.get_node(element) else {
            return false;
        };
        if index >= node.attr_count as usize {
            return false;
        }
        let slot = node.attr_start as usize + index;
        let name_id = self.strings.intern(name);
        let attr = &mut self.attributes[slot];
        attr.name_id = name_id;
        attr.prefix_id = 0;
        attr.namespace_id = 0;
        true
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[DomAttribute] {
        match self.get_node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or(&[])
            }
            None => &[],
        }
    }

    pub fn attribute_name(&self, attr: &DomAttribute) -> &str {
        self.strings.get(attr.name_id).unwrap_or("")
    }

    pub fn attribute_value(&self, attr: &DomAttribute) -> &str {
        self.strings.get(attr.value_id).unwrap_or("")
    }

    pub fn attribute_prefix(&self, attr: &DomAttribute) -> Option<&str> {
        (attr.prefix_id != 0).then(|| self.strings.get(attr.prefix_id)).flatten()
    }

    pub fn attribute_namespace(&self, attr: &DomAttribute) -> Option<&str> {
        attr.has_namespace().then(|| self.strings.get(attr.namespace_id)).flatten()
    }

    /// All attribute names and values for a node, in order
    pub fn get_attribute_values(&self, node_id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(node_id)
            .iter()
            .map(|attr| (self.attribute_name(attr), self.attribute_value(attr)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Internal subset
    // ------------------------------------------------------------------

    /// The document's DOCTYPE, if any
    pub fn internal_subset(&self) -> Option<DocumentType<'_>> {
        let subset = self.internal_subset?;
        Some(DocumentType {
            name: self.strings.get(subset.name_id).unwrap_or(""),
            external_id: subset.external_id.and_then(|id| self.strings.get(id)),
            system_id: subset.system_id.and_then(|id| self.strings.get(id)),
        })
    }

    /// Create the internal subset, public identifier first. Fails if the
    /// document already has one.
    pub fn create_internal_subset(
        &mut self,
        name: &str,
        external_id: Option<&str>,
        system_id: Option<&str>,
    ) -> bool {
        if self.internal_subset.is_some() {
            return false;
        }
        let name_id = self.strings.intern(name);
        let external_id = external_id.map(|s| self.strings.intern(s));
        let system_id = system_id.map(|s| self.strings.intern(s));
        self.internal_subset = Some(InternalSubset {
            name_id,
            external_id,
            system_id,
        });
        true
    }

    pub fn remove_internal_subset(&mut self) -> bool {
        self.internal_subset.take().is_some()
    }

    pub fn set_internal_subset_name(&mut self, name: &str) -> bool {
        let name_id = self.strings.intern(name);
        match self.internal_subset.as_mut() {
            Some(subset) => {
                subset.name_id = name_id;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Get the document node (index 0)
    pub fn document_node(&self) -> &DomNode {
        &self.nodes[DOCUMENT_NODE as usize]
    }

    /// Get root element ID
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id as usize)
    }

    /// Get element name
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings.get(node.name_id)
        } else {
            None
        }
    }

    /// Character data of a text, CDATA or comment node
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_character_data() {
            self.strings.get(node.name_id)
        } else {
            None
        }
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        // Initialize stack with all children in reverse order (so first is processed first)
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(id) {
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { doc: self, stack }
    }

    /// Get total number of nodes, detached ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d HtmlDocument,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first)
pub struct DescendantIter<'d> {
    doc: &'d HtmlDocument,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        if let Some(node) = self.doc.get_node(current) {
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.doc.get_node(id).and_then(|n| n.prev_sibling);
            }
        }

        Some(current)
    }
}

/// A finished document: the arena tree plus the parse errors reported for it
pub struct Document {
    tree: HtmlDocument,
    errors: Vec<SyntaxError>,
}

impl Document {
    /// Wrap a finished tree together with its errors
    pub fn wrap(tree: HtmlDocument, errors: Vec<SyntaxError>) -> Self {
        Document { tree, errors }
    }

    pub fn tree(&self) -> &HtmlDocument {
        &self.tree
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_parts(self) -> (HtmlDocument, Vec<SyntaxError>) {
        (self.tree, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::namespace::ns;

    fn element_with(doc: &mut HtmlDocument, attrs: &[(&str, &str)]) -> NodeId {
        let el = doc.create_element("div");
        for (name, value) in attrs {
            doc.set_attribute(el, name, value);
        }
        el
    }

    #[test]
    fn test_append_and_iterate() {
        let mut doc = HtmlDocument::new(None, None);
        let root = doc.create_element("html");
        let a = doc.create_element("a");
        let text = doc.create_text("hi");
        assert!(doc.append_child(root, a));
        assert!(doc.append_child(a, text));
        assert!(doc.set_root_element(root));

        assert_eq!(doc.root_element_id(), Some(root));
        assert_eq!(doc.children(DOCUMENT_NODE).collect::<Vec<_>>(), vec![root]);
        assert_eq!(doc.descendants(root).collect::<Vec<_>>(), vec![a, text]);
        assert_eq!(doc.text_content(text), Some("hi"));
        assert_eq!(doc.get_node(text).and_then(|n| n.parent), Some(a));
    }

    #[test]
    fn test_append_rejects_attached_child() {
        let mut doc = HtmlDocument::new(None, None);
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        assert!(doc.append_child(a, c));
        assert!(!doc.append_child(b, c));
        assert!(!doc.append_child(c, c));
        let text = doc.create_text("x");
        let other = doc.create_text("y");
        assert!(!doc.append_child(text, other));
    }

    #[test]
    fn test_siblings() {
        let mut doc = HtmlDocument::new(None, None);
        let root = doc.create_element("root");
        let kids: Vec<_> = ["a", "b", "c"].iter().map(|n| doc.create_element(n)).collect();
        for &k in &kids {
            doc.append_child(root, k);
        }
        assert_eq!(doc.children(root).collect::<Vec<_>>(), kids);

        let first = doc.get_node(kids[0]).unwrap();
        assert!(first.prev_sibling.is_none());
        assert_eq!(first.next_sibling, Some(kids[1]));
    }

    #[test]
    fn test_set_root_element_replaces_previous_root() {
        let mut doc = HtmlDocument::new(None, None);
        let first = doc.create_element("first");
        let second = doc.create_element("second");
        doc.set_root_element(first);
        doc.set_root_element(second);
        assert_eq!(doc.root_element_id(), Some(second));
        assert_eq!(doc.children(DOCUMENT_NODE).collect::<Vec<_>>(), vec![second]);
        assert!(doc.get_node(first).unwrap().parent.is_none());
    }

    #[test]
    fn test_plain_attribute_set_and_replace() {
        let mut doc = HtmlDocument::new(None, None);
        let el = element_with(&mut doc, &[("a", "1"), ("b", "2")]);
        assert_eq!(doc.set_attribute(el, "a", "3"), Some(0));
        assert_eq!(doc.get_attribute_values(el), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_colon_aware_setter_binds_xml_prefix() {
        let mut doc = HtmlDocument::new(None, None);
        let el = element_with(&mut doc, &[("xml:lang", "en")]);

        let attr = doc.attributes(el)[0];
        assert_eq!(doc.attribute_name(&attr), "lang");
        assert_eq!(doc.attribute_prefix(&attr), Some("xml"));
        assert_eq!(doc.attribute_namespace(&attr), Some(ns::XML));
        assert!(doc.has_attribute(el, "lang"));
        assert!(!doc.has_attribute(el, "xml:lang"));
    }

    #[test]
    fn test_colon_aware_setter_keeps_unbound_prefix_literal() {
        let mut doc = HtmlDocument::new(None, None);
        let el = element_with(&mut doc, &[("foo:bar", "1")]);
        assert!(doc.has_attribute(el, "foo:bar"));
        assert_eq!(doc.attribute_namespace(&doc.attributes(el)[0]), None);

        doc.declare_namespace("foo", "http://example.com/foo");
        let other = element_with(&mut doc, &[("foo:bar", "1")]);
        assert!(doc.has_attribute(other, "bar"));
    }

    #[test]
    fn test_interleaved_elements_keep_their_attributes() {
        let mut doc = HtmlDocument::new(None, None);
        let first = element_with(&mut doc, &[("a", "1")]);
        let second = element_with(&mut doc, &[("x", "9")]);
        doc.set_attribute(first, "b", "2");

        assert_eq!(doc.get_attribute_values(first), vec![("a", "1"), ("b", "2")]);
        assert_eq!(doc.get_attribute_values(second), vec![("x", "9")]);
    }

    #[test]
    fn test_remove_attribute_preserves_order() {
        let mut doc = HtmlDocument::new(None, None);
        let el = element_with(&mut doc, &[("a", "1"), ("b", "2"), ("c", "3")]);
        assert!(doc.remove_attribute(el, "b"));
        assert!(!doc.remove_attribute(el, "b"));
        assert_eq!(doc.get_attribute_values(el), vec![("a", "1"), ("c", "3")]);

        doc.set_attribute(el, "d", "4");
        assert_eq!(
            doc.get_attribute_values(el),
            vec![("a", "1"), ("c", "3"), ("d", "4")]
        );
    }

    #[test]
    fn test_rename_attribute() {
        let mut doc = HtmlDocument::new(None, None);
        let el = element_with(&mut doc, &[("a", "1")]);
        assert!(doc.rename_attribute(el, 0, "xml:lang"));
        assert!(!doc.rename_attribute(el, 1, "nope"));
        assert_eq!(doc.get_attribute(el, "xml:lang"), Some("1"));
        assert_eq!(doc.attribute_namespace(&doc.attributes(el)[0]), None);
    }

    #[test]
    fn test_constructor_without_identifiers_has_no_subset() {
        let doc = HtmlDocument::new(None, None);
        assert!(doc.internal_subset().is_none());
    }

    #[test]
    fn test_constructor_takes_system_id_first() {
        let doc = HtmlDocument::new(Some("about:legacy-compat"), Some("-//W3C//DTD HTML 4.01//EN"));
        let subset = doc.internal_subset().unwrap();
        assert_eq!(subset.name, "html");
        assert_eq!(subset.system_id, Some("about:legacy-compat"));
        assert_eq!(subset.external_id, Some("-//W3C//DTD HTML 4.01//EN"));
    }

    #[test]
    fn test_internal_subset_lifecycle() {
        let mut doc = HtmlDocument::new(None, None);
        assert!(!doc.set_internal_subset_name("html"));
        assert!(doc.create_internal_subset("html", Some("pub"), Some("sys")));
        assert!(!doc.create_internal_subset("again", None, None));

        let subset = doc.internal_subset().unwrap();
        assert_eq!(subset.external_id, Some("pub"));
        assert_eq!(subset.system_id, Some("sys"));

        assert!(doc.set_internal_subset_name("svg"));
        assert_eq!(doc.internal_subset().unwrap().name, "svg");
        assert!(doc.remove_internal_subset());
        assert!(doc.internal_subset().is_none());
    }
}
