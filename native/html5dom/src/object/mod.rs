//! Object-model DOM
//!
//! Reference-counted node objects that already are the library's public
//! form: no arena and no final wrapping step. Handles are cheap to clone;
//! children are owned by their parent and point back through weak links.

use crate::dom::namespace::{builtin_prefix, split_qname};
use crate::dom::SyntaxError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Public identifier of the subset a bare `DocumentRef::new` creates
pub const DEFAULT_PUBLIC_ID: &str = "-//W3C//DTD HTML 4.0 Transitional//EN";
/// System identifier of the subset a bare `DocumentRef::new` creates
pub const DEFAULT_SYSTEM_ID: &str = "http://www.w3.org/TR/REC-html40/loose.dtd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    pub name: String,
    /// Public identifier
    pub external_id: Option<String>,
    /// System identifier
    pub system_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    CData,
    Comment,
}

#[derive(Debug)]
enum NodeData {
    Element { name: String, attributes: Vec<AttrRef> },
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Default)]
enum Parent {
    #[default]
    Detached,
    Document(Weak<RefCell<DocumentData>>),
    Node(Weak<RefCell<NodeInner>>),
}

#[derive(Debug)]
struct NodeInner {
    data: NodeData,
    parent: Parent,
    children: Vec<NodeRef>,
}

impl Drop for NodeInner {
    // Children only this node still owns are unlinked here, so dropping a
    // deep subtree does not recurse
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(node.0) {
                pending.append(&mut cell.into_inner().children);
            }
        }
    }
}

/// Handle to a DOM node
#[derive(Debug, Clone)]
pub struct NodeRef(Rc<RefCell<NodeInner>>);

#[derive(Debug)]
struct AttrData {
    name: String,
    prefix: Option<String>,
    namespace: Option<&'static str>,
    value: String,
}

/// Handle to an attribute object owned by an element
#[derive(Debug, Clone)]
pub struct AttrRef(Rc<RefCell<AttrData>>);

#[derive(Debug, Default)]
struct DocumentData {
    internal_subset: Option<DocumentType>,
    children: Vec<NodeRef>,
    root: Option<NodeRef>,
    errors: Vec<SyntaxError>,
}

/// Handle to a document
#[derive(Debug, Clone)]
pub struct DocumentRef(Rc<RefCell<DocumentData>>);

impl AttrRef {
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn prefix(&self) -> Option<String> {
        self.0.borrow().prefix.clone()
    }

    pub fn namespace(&self) -> Option<&'static str> {
        self.0.borrow().namespace
    }

    /// Give the attribute the literal name `name`, dropping any prefix and
    /// namespace binding
    pub fn set_name(&self, name: &str) {
        let mut attr = self.0.borrow_mut();
        attr.name = name.to_string();
        attr.prefix = None;
        attr.namespace = None;
    }
}

impl NodeRef {
    fn new(data: NodeData) -> Self {
        NodeRef(Rc::new(RefCell::new(NodeInner {
            data,
            parent: Parent::Detached,
            children: Vec::new(),
        })))
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn kind(&self) -> NodeKind {
        match self.0.borrow().data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::CData(_) => NodeKind::CData,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }

    /// Element name
    pub fn name(&self) -> Option<String> {
        match &self.0.borrow().data {
            NodeData::Element { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    /// Character data of a text, CDATA or comment node
    pub fn content(&self) -> Option<String> {
        match &self.0.borrow().data {
            NodeData::Text(s) | NodeData::CData(s) | NodeData::Comment(s) => Some(s.clone()),
            NodeData::Element { .. } => None,
        }
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    /// Parent element, if the node is attached below an element
    pub fn parent(&self) -> Option<NodeRef> {
        match &self.0.borrow().parent {
            Parent::Node(weak) => weak.upgrade().map(NodeRef),
            _ => None,
        }
    }

    /// Document holding this node at top level
    pub fn document(&self) -> Option<DocumentRef> {
        match &self.0.borrow().parent {
            Parent::Document(weak) => weak.upgrade().map(DocumentRef),
            _ => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self.0.borrow().parent, Parent::Detached)
    }

    /// Append a detached node as the last child of this element
    pub fn add_child(&self, child: &NodeRef) -> bool {
        if self.ptr_eq(child) || child.is_attached() || self.kind() != NodeKind::Element {
            return false;
        }
        child.0.borrow_mut().parent = Parent::Node(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
        true
    }

    /// Set an attribute, interpreting `prefix:local` names.
    ///
    /// `xml:` and `xmlns:` names are stored as their local part bound to the
    /// corresponding namespace; any other name is stored literally. An
    /// existing attribute with the same identity has its value replaced.
    pub fn set_attribute(&self, name: &str, value: &str) -> Option<AttrRef> {
        let mut node = self.0.borrow_mut();
        let NodeData::Element { attributes, .. } = &mut node.data else {
            return None;
        };

        let (prefix, local) = split_qname(name);
        let (name, prefix, namespace) = match prefix.and_then(|p| builtin_prefix(p).map(|uri| (p, uri))) {
            Some((p, uri)) => (local, Some(p.to_string()), Some(uri)),
            None => (name, None, None),
        };

        if let Some(existing) = attributes.iter().find(|a| {
            let a = a.0.borrow();
            a.name == name && a.namespace == namespace
        }) {
            existing.0.borrow_mut().value = value.to_string();
            return Some(existing.clone());
        }

        let attr = AttrRef(Rc::new(RefCell::new(AttrData {
            name: name.to_string(),
            prefix,
            namespace,
            value: value.to_string(),
        })));
        attributes.push(attr.clone());
        Some(attr)
    }

    /// The attribute whose name is exactly `name`
    pub fn attribute(&self, name: &str) -> Option<AttrRef> {
        match &self.0.borrow().data {
            NodeData::Element { attributes, .. } => {
                attributes.iter().find(|a| a.0.borrow().name == name).cloned()
            }
            _ => None,
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.attribute(name).map(|a| a.value())
    }

    pub fn remove_attribute(&self, name: &str) -> bool {
        let mut node = self.0.borrow_mut();
        let NodeData::Element { attributes, .. } = &mut node.data else {
            return false;
        };
        match attributes.iter().position(|a| a.0.borrow().name == name) {
            Some(index) => {
                attributes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn attribute_nodes(&self) -> Vec<AttrRef> {
        match &self.0.borrow().data {
            NodeData::Element { attributes, .. } => attributes.clone(),
            _ => Vec::new(),
        }
    }

    /// (name, value) pairs in order
    pub fn attribute_pairs(&self) -> Vec<(String, String)> {
        self.attribute_nodes()
            .iter()
            .map(|a| (a.name(), a.value()))
            .collect()
    }
}

impl DocumentRef {
    /// Create a document, system identifier (`uri`) first and public
    /// identifier (`external_id`) second.
    ///
    /// An internal subset named `html` is always created; when both
    /// identifiers are absent it carries the HTML 4.0 Transitional ones.
    pub fn new(uri: Option<&str>, external_id: Option<&str>) -> Self {
        let (external_id, system_id) = match (external_id, uri) {
            (None, None) => (Some(DEFAULT_PUBLIC_ID), Some(DEFAULT_SYSTEM_ID)),
            ids => ids,
        };
        let doc = DocumentRef(Rc::new(RefCell::new(DocumentData::default())));
        doc.create_internal_subset("html", external_id, system_id);
        doc
    }

    pub fn create_element(&self, name: &str) -> NodeRef {
        NodeRef::new(NodeData::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text_node(&self, data: &str) -> NodeRef {
        NodeRef::new(NodeData::Text(data.to_string()))
    }

    pub fn create_cdata_section(&self, data: &str) -> NodeRef {
        NodeRef::new(NodeData::CData(data.to_string()))
    }

    pub fn create_comment(&self, data: &str) -> NodeRef {
        NodeRef::new(NodeData::Comment(data.to_string()))
    }

    pub fn internal_subset(&self) -> Option<DocumentType> {
        self.0.borrow().internal_subset.clone()
    }

    /// Create the internal subset, public identifier first. Fails if the
    /// document already has one.
    pub fn create_internal_subset(
        &self,
        name: &str,
        external_id: Option<&str>,
        system_id: Option<&str>,
    ) -> bool {
        let mut doc = self.0.borrow_mut();
        if doc.internal_subset.is_some() {
            return false;
        }
        doc.internal_subset = Some(DocumentType {
            name: name.to_string(),
            external_id: external_id.map(str::to_string),
            system_id: system_id.map(str::to_string),
        });
        true
    }

    pub fn remove_internal_subset(&self) -> bool {
        self.0.borrow_mut().internal_subset.take().is_some()
    }

    pub fn set_internal_subset_name(&self, name: &str) -> bool {
        match self.0.borrow_mut().internal_subset.as_mut() {
            Some(subset) => {
                subset.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Append a detached node at document level
    pub fn add_child(&self, child: &NodeRef) -> bool {
        if child.is_attached() {
            return false;
        }
        child.0.borrow_mut().parent = Parent::Document(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
        true
    }

    /// Append `root` at document level and make it the root element
    pub fn set_root_element(&self, root: &NodeRef) -> bool {
        if root.kind() != NodeKind::Element || !self.add_child(root) {
            return false;
        }
        self.0.borrow_mut().root = Some(root.clone());
        true
    }

    pub fn root_element(&self) -> Option<NodeRef> {
        self.0.borrow().root.clone()
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    pub fn errors(&self) -> Vec<SyntaxError> {
        self.0.borrow().errors.clone()
    }

    pub fn set_errors(&self, errors: Vec<SyntaxError>) {
        self.0.borrow_mut().errors = errors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::namespace::ns;

    #[test]
    fn test_new_document_always_has_subset() {
        let doc = DocumentRef::new(None, None);
        let subset = doc.internal_subset().unwrap();
        assert_eq!(subset.name, "html");
        assert_eq!(subset.external_id.as_deref(), Some(DEFAULT_PUBLIC_ID));
        assert_eq!(subset.system_id.as_deref(), Some(DEFAULT_SYSTEM_ID));
    }

    #[test]
    fn test_new_document_takes_system_id_first() {
        let doc = DocumentRef::new(Some("sys"), None);
        let subset = doc.internal_subset().unwrap();
        assert_eq!(subset.system_id.as_deref(), Some("sys"));
        assert_eq!(subset.external_id, None);
    }

    #[test]
    fn test_subset_lifecycle() {
        let doc = DocumentRef::new(None, None);
        assert!(!doc.create_internal_subset("html", None, None));
        assert!(doc.remove_internal_subset());
        assert!(!doc.set_internal_subset_name("x"));
        assert!(doc.create_internal_subset("html", None, None));
        assert!(doc.set_internal_subset_name("svg"));
        assert_eq!(doc.internal_subset().unwrap().name, "svg");
    }

    #[test]
    fn test_tree_building() {
        let doc = DocumentRef::new(None, None);
        let root = doc.create_element("html");
        let text = doc.create_text_node("hi");
        assert!(root.add_child(&text));
        assert!(!root.add_child(&text));
        assert!(doc.set_root_element(&root));

        assert!(doc.root_element().unwrap().ptr_eq(&root));
        assert!(text.parent().unwrap().ptr_eq(&root));
        assert_eq!(root.children().len(), 1);
        assert_eq!(text.content().as_deref(), Some("hi"));
        assert!(!text.add_child(&doc.create_comment("c")));
        assert!(root.document().is_some());
        assert!(text.document().is_none());
    }

    #[test]
    fn test_colon_aware_setter() {
        let doc = DocumentRef::new(None, None);
        let el = doc.create_element("p");
        el.set_attribute("xml:lang", "en");
        el.set_attribute("xlink:href", "#a");

        let lang = el.attribute("lang").unwrap();
        assert_eq!(lang.namespace(), Some(ns::XML));
        assert_eq!(lang.prefix().as_deref(), Some("xml"));
        assert!(el.has_attribute("xlink:href"));
        assert!(!el.has_attribute("xml:lang"));
    }

    #[test]
    fn test_attribute_replace_remove_rename() {
        let doc = DocumentRef::new(None, None);
        let el = doc.create_element("p");
        el.set_attribute("a", "1");
        el.set_attribute("b", "2");
        el.set_attribute("a", "3");
        assert_eq!(
            el.attribute_pairs(),
            vec![("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );

        assert!(el.remove_attribute("a"));
        assert!(!el.remove_attribute("a"));

        el.attribute("b").unwrap().set_name("c");
        assert_eq!(el.get_attribute("c").as_deref(), Some("2"));
        assert!(!el.has_attribute("b"));
    }

    #[test]
    fn test_deep_tree_drops() {
        let doc = DocumentRef::new(None, None);
        let root = doc.create_element("div");
        let mut parent = root.clone();
        for _ in 0..200_000 {
            let child = doc.create_element("div");
            assert!(parent.add_child(&child));
            parent = child;
        }
        drop(parent);
        assert!(doc.set_root_element(&root));
        drop(root);
        drop(doc);
    }
}
