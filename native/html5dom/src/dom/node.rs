//! DOM Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// The document node always lives at index 0
pub const DOCUMENT_NODE: NodeId = 0;

/// Type of DOM node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct DomNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document and for detached nodes)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for the element name, or the character data
    /// of text, CDATA and comment nodes
    pub name_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u32,
}

impl DomNode {
    fn detached(kind: NodeKind, name_id: u32) -> Self {
        DomNode {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self::detached(NodeKind::Document, 0)
    }

    /// Create a detached element node
    pub fn element(name_id: u32) -> Self {
        Self::detached(NodeKind::Element, name_id)
    }

    /// Create a detached text node
    pub fn text(content_id: u32) -> Self {
        Self::detached(NodeKind::Text, content_id)
    }

    /// Create a detached CDATA node
    pub fn cdata(content_id: u32) -> Self {
        Self::detached(NodeKind::CData, content_id)
    }

    /// Create a detached comment node
    pub fn comment(content_id: u32) -> Self {
        Self::detached(NodeKind::Comment, content_id)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Text, CDATA and comment nodes carry character data in `name_id`
    #[inline]
    pub fn is_character_data(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData | NodeKind::Comment)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomAttribute {
    /// Index into string pool for the attribute name (local part when the
    /// attribute is bound to a namespace)
    pub name_id: u32,
    /// Index into string pool for the namespace prefix, or 0
    pub prefix_id: u32,
    /// Index into string pool for the namespace URI, or 0
    pub namespace_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl DomAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        DomAttribute {
            name_id,
            prefix_id: 0,
            namespace_id: 0,
            value_id,
        }
    }

    #[inline]
    pub fn has_namespace(&self) -> bool {
        self.namespace_id != 0
    }
}
