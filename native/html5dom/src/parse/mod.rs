//! Parse-tree model and the HTML5 parser collaborator
//!
//! The converter reads an owned, immutable parse tree produced by an
//! [`Html5Parser`]. [`Html5everParser`] is the bundled implementation.

pub mod caret;
pub mod html5;

use crate::error::Result;

pub use html5::Html5everParser;

/// Namespace category of a parsed attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeNamespace {
    #[default]
    None,
    XLink,
    Xml,
    Xmlns,
}

/// Parsed attribute; `name` is the local name without any prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub namespace: AttributeNamespace,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            namespace: AttributeNamespace::None,
        }
    }

    pub fn with_namespace(mut self, namespace: AttributeNamespace) -> Self {
        self.namespace = namespace;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseElement {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<ParseNode>,
}

impl ParseElement {
    pub fn new(name: impl Into<String>) -> Self {
        ParseElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn child(mut self, node: ParseNode) -> Self {
        self.children.push(node);
        self
    }
}

impl Drop for ParseElement {
    // Flatten the subtree so deep nesting does not recurse
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            match &mut node {
                ParseNode::Element(el) | ParseNode::Template(el) => pending.append(&mut el.children),
                ParseNode::Document(doc) => pending.append(&mut doc.children),
                _ => {}
            }
        }
    }
}

/// The document node. Identifier strings use the empty string for "absent".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseDocument {
    pub has_doctype: bool,
    pub name: String,
    pub public_identifier: String,
    pub system_identifier: String,
    /// Top-level children, including the root element
    pub children: Vec<ParseNode>,
    /// Index of the root element within `children`
    pub root: Option<usize>,
}

impl ParseDocument {
    pub fn public_id(&self) -> Option<&str> {
        non_empty(&self.public_identifier)
    }

    pub fn system_id(&self) -> Option<&str> {
        non_empty(&self.system_identifier)
    }

    /// Doctype name, if a doctype was declared
    pub fn doctype_name(&self) -> Option<&str> {
        self.has_doctype.then_some(self.name.as_str())
    }

    pub fn root_element(&self) -> Option<&ParseNode> {
        self.root.and_then(|i| self.children.get(i))
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNode {
    Document(Box<ParseDocument>),
    Element(ParseElement),
    Template(ParseElement),
    Text(String),
    Whitespace(String),
    CData(String),
    Comment(String),
}

/// Classification of parser errors, with stable numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorKind {
    #[default]
    Other,
    UnexpectedToken,
    UnexpectedTag,
    UnexpectedCharacter,
    CharacterReference,
    UnexpectedEof,
    Doctype,
    DuplicateAttribute,
}

impl ParseErrorKind {
    pub fn code(self) -> u32 {
        match self {
            ParseErrorKind::Other => 0,
            ParseErrorKind::UnexpectedToken => 1,
            ParseErrorKind::UnexpectedTag => 2,
            ParseErrorKind::UnexpectedCharacter => 3,
            ParseErrorKind::CharacterReference => 4,
            ParseErrorKind::UnexpectedEof => 5,
            ParseErrorKind::Doctype => 6,
            ParseErrorKind::DuplicateAttribute => 7,
        }
    }
}

/// 1-based line and column plus the byte offset of the start of the
/// reported line. `column` is `None` when the parser cannot tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: Option<u32>,
    pub offset: usize,
}

impl SourcePosition {
    /// Column to report, 1 when unknown
    pub fn reported_column(&self) -> u32 {
        self.column.unwrap_or(1)
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        SourcePosition {
            line: 1,
            column: None,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub position: SourcePosition,
}

/// A parse tree and the errors reported while building it, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutput {
    pub document: ParseDocument,
    pub errors: Vec<ParseError>,
}

/// HTML5 parser collaborator
pub trait Html5Parser {
    /// Parse `input`, keeping at most `max_errors` errors (`None` keeps all).
    ///
    /// Fails only when no tree can be produced at all.
    fn parse(&self, input: &[u8], max_errors: Option<usize>) -> Result<ParseOutput>;

    /// Render a caret diagnostic for `error` against the source it came from
    fn format_error(&self, error: &ParseError, input: &[u8]) -> String {
        caret::format_error(error, input)
    }
}
