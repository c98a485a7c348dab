//! html5ever-backed parser
//!
//! Runs html5ever's tree builder into an `RcDom`, wrapped in a sink that
//! records each parse error with the line the tree builder was on, then
//! copies the `RcDom` into an owned [`ParseDocument`].

use super::{
    Attribute, AttributeNamespace, Html5Parser, ParseDocument, ParseElement, ParseError,
    ParseErrorKind, ParseNode, ParseOutput, SourcePosition,
};
use crate::error::{Error, Result};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{namespace_url, ns, parse_document, ExpandedName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use memchr::memchr_iter;
use std::borrow::Cow;

/// [`Html5Parser`] over html5ever
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everParser;

impl Html5everParser {
    pub fn new() -> Self {
        Html5everParser
    }
}

impl Html5Parser for Html5everParser {
    fn parse(&self, input: &[u8], max_errors: Option<usize>) -> Result<ParseOutput> {
        if u32::try_from(input.len()).is_err() {
            return Err(Error::Parser(format!(
                "input of {} bytes exceeds the addressable size",
                input.len()
            )));
        }

        let sink = LineTrackingSink {
            dom: RcDom::default(),
            line: 1,
            errors: Vec::new(),
            max_errors,
        };
        let sink = parse_document(sink, ParseOpts::default())
            .from_utf8()
            .one(input);

        let line_starts = line_starts(input);
        let errors = sink
            .errors
            .into_iter()
            .map(|(line, message)| {
                let line = u32::try_from(line).unwrap_or(u32::MAX);
                let offset = line_starts
                    .get(line.saturating_sub(1) as usize)
                    .copied()
                    .unwrap_or(input.len());
                ParseError {
                    kind: classify(&message),
                    message: message.into_owned(),
                    position: SourcePosition {
                        line,
                        column: None,
                        offset,
                    },
                }
            })
            .collect::<Vec<_>>();

        log::trace!(target: "html5dom::parse", "html5ever reported {} errors", errors.len());

        Ok(ParseOutput {
            document: convert_document(&sink.dom.document),
            errors,
        })
    }
}

/// Byte offset of the start of each line
fn line_starts(input: &[u8]) -> Vec<usize> {
    std::iter::once(0)
        .chain(memchr_iter(b'\n', input).map(|i| i + 1))
        .collect()
}

/// Map an html5ever message onto a stable error kind
///
/// html5ever reports free text. Without `exact_errors` the messages are
/// fixed strings, pinned in the tests below.
fn classify(message: &str) -> ParseErrorKind {
    let lower = message.to_ascii_lowercase();
    if lower.starts_with("duplicate attribute") {
        ParseErrorKind::DuplicateAttribute
    } else if lower.contains("doctype") || lower.contains("quirks") {
        ParseErrorKind::Doctype
    } else if lower.contains("eof") {
        ParseErrorKind::UnexpectedEof
    } else if lower.contains("character reference") {
        ParseErrorKind::CharacterReference
    } else if lower.contains("tag") {
        ParseErrorKind::UnexpectedTag
    } else if lower.starts_with("bad character") || lower.starts_with("unexpected character") {
        ParseErrorKind::UnexpectedCharacter
    } else if lower.starts_with("unexpected token") {
        ParseErrorKind::UnexpectedToken
    } else {
        ParseErrorKind::Other
    }
}

fn is_html_whitespace(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| matches!(b, b' ' | b'\t' | b'\n' | 0x0C | b'\r'))
}

fn convert_document(document: &Handle) -> ParseDocument {
    let mut doc = ParseDocument::default();
    for child in document.children.borrow().iter() {
        if let NodeData::Doctype {
            name,
            public_id,
            system_id,
        } = &child.data
        {
            doc.has_doctype = true;
            doc.name = name.to_string();
            doc.public_identifier = public_id.to_string();
            doc.system_identifier = system_id.to_string();
            continue;
        }
        if let Some(node) = convert_node(child) {
            if doc.root.is_none() && matches!(node, ParseNode::Element(_)) {
                doc.root = Some(doc.children.len());
            }
            doc.children.push(node);
        }
    }
    doc
}

/// Element whose children are still being copied
struct OpenElement {
    element: ParseElement,
    is_template: bool,
    /// Node whose children are copied: the element, or its template contents
    source: Handle,
    next: usize,
}

impl OpenElement {
    fn close(self) -> ParseNode {
        if self.is_template {
            ParseNode::Template(self.element)
        } else {
            ParseNode::Element(self.element)
        }
    }
}

enum Visit {
    Leaf(Option<ParseNode>),
    Open(OpenElement),
}

/// Copy one `RcDom` subtree. Depth lives on the heap, so nesting is bounded
/// only by memory.
fn convert_node(handle: &Handle) -> Option<ParseNode> {
    let mut stack = match visit(handle) {
        Visit::Leaf(node) => return node,
        Visit::Open(open) => vec![open],
    };

    loop {
        let top = stack.last_mut()?;
        let child = top.source.children.borrow().get(top.next).cloned();
        top.next += 1;

        match child {
            Some(child) => match visit(&child) {
                Visit::Leaf(Some(node)) => top.element.children.push(node),
                Visit::Leaf(None) => {}
                Visit::Open(open) => stack.push(open),
            },
            None => {
                let node = stack.pop()?.close();
                match stack.last_mut() {
                    Some(parent) => parent.element.children.push(node),
                    None => return Some(node),
                }
            }
        }
    }
}

fn visit(handle: &Handle) -> Visit {
    match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let contents = template_contents.borrow().clone();
            Visit::Open(OpenElement {
                element: ParseElement {
                    name: name.local.to_string(),
                    attributes: attrs.borrow().iter().map(convert_attribute).collect(),
                    children: Vec::new(),
                },
                is_template: contents.is_some(),
                source: contents.unwrap_or_else(|| handle.clone()),
                next: 0,
            })
        }
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            Visit::Leaf(Some(if is_html_whitespace(&text) {
                ParseNode::Whitespace(text)
            } else {
                ParseNode::Text(text)
            }))
        }
        NodeData::Comment { contents } => Visit::Leaf(Some(ParseNode::Comment(contents.to_string()))),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            Visit::Leaf(None)
        }
    }
}

fn convert_attribute(attr: &html5ever::Attribute) -> Attribute {
    let namespace = if attr.name.ns == ns!(xlink) {
        AttributeNamespace::XLink
    } else if attr.name.ns == ns!(xml) {
        AttributeNamespace::Xml
    } else if attr.name.ns == ns!(xmlns) {
        AttributeNamespace::Xmlns
    } else {
        AttributeNamespace::None
    };
    Attribute {
        name: attr.name.local.to_string(),
        value: attr.value.to_string(),
        namespace,
    }
}

/// `RcDom` plus the line of each reported error
struct LineTrackingSink {
    dom: RcDom,
    line: u64,
    errors: Vec<(u64, Cow<'static, str>)>,
    max_errors: Option<usize>,
}

impl TreeSink for LineTrackingSink {
    type Handle = Handle;
    type Output = Self;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        if self.max_errors.map_or(true, |max| self.errors.len() < max) {
            self.errors.push((self.line, msg));
        }
    }

    fn set_current_line(&mut self, line_number: u64) {
        self.line = line_number;
    }

    fn get_document(&mut self) -> Handle {
        self.dom.get_document()
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> ExpandedName<'a> {
        self.dom.elem_name(target)
    }

    fn create_element(&mut self, name: QualName, attrs: Vec<html5ever::Attribute>, flags: ElementFlags) -> Handle {
        self.dom.create_element(name, attrs, flags)
    }

    fn create_comment(&mut self, text: StrTendril) -> Handle {
        self.dom.create_comment(text)
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> Handle {
        self.dom.create_pi(target, data)
    }

    fn append(&mut self, parent: &Handle, child: NodeOrText<Handle>) {
        self.dom.append(parent, child)
    }

    fn append_based_on_parent_node(&mut self, element: &Handle, prev_element: &Handle, child: NodeOrText<Handle>) {
        self.dom.append_based_on_parent_node(element, prev_element, child)
    }

    fn append_doctype_to_document(&mut self, name: StrTendril, public_id: StrTendril, system_id: StrTendril) {
        self.dom.append_doctype_to_document(name, public_id, system_id)
    }

    fn mark_script_already_started(&mut self, node: &Handle) {
        self.dom.mark_script_already_started(node)
    }

    fn get_template_contents(&mut self, target: &Handle) -> Handle {
        self.dom.get_template_contents(target)
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        self.dom.same_node(x, y)
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.dom.set_quirks_mode(mode)
    }

    fn append_before_sibling(&mut self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        self.dom.append_before_sibling(sibling, new_node)
    }

    fn add_attrs_if_missing(&mut self, target: &Handle, attrs: Vec<html5ever::Attribute>) {
        self.dom.add_attrs_if_missing(target, attrs)
    }

    fn remove_from_parent(&mut self, target: &Handle) {
        self.dom.remove_from_parent(target)
    }

    fn reparent_children(&mut self, node: &Handle, new_parent: &Handle) {
        self.dom.reparent_children(node, new_parent)
    }

    fn is_mathml_annotation_xml_integration_point(&self, handle: &Handle) -> bool {
        self.dom.is_mathml_annotation_xml_integration_point(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseOutput {
        Html5everParser::new().parse(input.as_bytes(), None).unwrap()
    }

    fn element(node: &ParseNode) -> &ParseElement {
        match node {
            ParseNode::Element(el) | ParseNode::Template(el) => el,
            other => panic!("expected element, got {other:?}"),
        }
    }

    fn find<'a>(el: &'a ParseElement, name: &str) -> Option<&'a ParseNode> {
        el.children.iter().find_map(|child| match child {
            ParseNode::Element(e) | ParseNode::Template(e) if e.name == name => Some(child),
            ParseNode::Element(e) | ParseNode::Template(e) => find(e, name),
            _ => None,
        })
    }

    #[test]
    fn test_doctype_is_lifted() {
        let out = parse("<!DOCTYPE html><p>hi</p>");
        let doc = &out.document;
        assert!(doc.has_doctype);
        assert_eq!(doc.name, "html");
        assert_eq!(doc.public_id(), None);
        assert_eq!(doc.system_id(), None);
        assert_eq!(doc.children.len(), 1);
        assert_eq!(element(doc.root_element().unwrap()).name, "html");
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_leading_comment_is_top_level() {
        let out = parse("<!-- c --><!DOCTYPE html><html></html>");
        let doc = &out.document;
        assert_eq!(doc.children[0], ParseNode::Comment(" c ".into()));
        assert_eq!(doc.root, Some(1));
    }

    #[test]
    fn test_whitespace_and_text() {
        let out = parse("<!DOCTYPE html><body><p>a</p> <p>b</p></body>");
        let html = element(out.document.root_element().unwrap());
        let body = element(find(html, "body").unwrap());
        assert_eq!(body.children[1], ParseNode::Whitespace(" ".into()));
        let p = element(&body.children[0]);
        assert_eq!(p.children, vec![ParseNode::Text("a".into())]);
    }

    #[test]
    fn test_template_contents_become_children() {
        let out = parse("<!DOCTYPE html><template><b>x</b></template>");
        let html = element(out.document.root_element().unwrap());
        let template = find(html, "template").unwrap();
        assert!(matches!(template, ParseNode::Template(_)));
        assert_eq!(element(&element(template).children[0]).name, "b");
    }

    #[test]
    fn test_foreign_attribute_namespaces() {
        let out = parse(
            r##"<!DOCTYPE html><svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><a xlink:href="#x" xml:lang="en"/></svg>"##,
        );
        let html = element(out.document.root_element().unwrap());
        let svg = element(find(html, "svg").unwrap());
        assert_eq!(
            svg.attributes,
            vec![
                Attribute::new("xmlns", "http://www.w3.org/2000/svg")
                    .with_namespace(AttributeNamespace::Xmlns),
                Attribute::new("xlink", "http://www.w3.org/1999/xlink")
                    .with_namespace(AttributeNamespace::Xmlns),
            ]
        );
        let a = element(&svg.children[0]);
        assert_eq!(
            a.attributes,
            vec![
                Attribute::new("href", "#x").with_namespace(AttributeNamespace::XLink),
                Attribute::new("lang", "en").with_namespace(AttributeNamespace::Xml),
            ]
        );
    }

    #[test]
    fn test_colon_in_html_attribute_is_literal() {
        let out = parse(r#"<!DOCTYPE html><p xml:lang="en"></p>"#);
        let html = element(out.document.root_element().unwrap());
        let p = element(find(html, "p").unwrap());
        assert_eq!(p.attributes, vec![Attribute::new("xml:lang", "en")]);
    }

    #[test]
    fn test_error_lines() {
        let input = "<!DOCTYPE html>\n\n</x>";
        let out = parse(input);
        let first = &out.errors[0];
        assert_eq!(first.position.line, 3);
        assert_eq!(first.position.column, None);
        assert_eq!(first.position.offset, 17);
    }

    #[test]
    fn test_deep_nesting() {
        let input = format!("<!DOCTYPE html>{}x", "<div>".repeat(5000));
        let out = parse(&input);
        let html = element(out.document.root_element().unwrap());
        let mut depth = 0;
        let mut current = element(find(html, "body").unwrap());
        while let Some(ParseNode::Element(child)) = current.children.first() {
            depth += 1;
            current = child;
        }
        assert_eq!(depth, 5000);
        assert_eq!(current.children, vec![ParseNode::Text("x".into())]);
    }

    #[test]
    fn test_error_limit() {
        let input = b"</a></b></c></d>";
        let all = Html5everParser::new().parse(input, None).unwrap();
        assert!(all.errors.len() > 1);
        let one = Html5everParser::new().parse(input, Some(1)).unwrap();
        assert_eq!(one.errors.len(), 1);
        assert_eq!(one.errors[0], all.errors[0]);
        let none = Html5everParser::new().parse(input, Some(0)).unwrap();
        assert!(none.errors.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let out = Html5everParser::new()
            .parse(b"<!DOCTYPE html><p>a\xFFb</p>", None)
            .unwrap();
        let html = element(out.document.root_element().unwrap());
        let p = element(find(html, "p").unwrap());
        assert_eq!(p.children, vec![ParseNode::Text("a\u{FFFD}b".into())]);
    }

    #[test]
    fn test_classify() {
        let pinned = [
            ("Unexpected token", ParseErrorKind::UnexpectedToken),
            ("Unexpected EOF", ParseErrorKind::UnexpectedEof),
            ("Saw EOF in state Data", ParseErrorKind::UnexpectedEof),
            ("Bad character", ParseErrorKind::UnexpectedCharacter),
            ("Duplicate attribute", ParseErrorKind::DuplicateAttribute),
            ("Bad DOCTYPE", ParseErrorKind::Doctype),
            ("Found special tag while closing generic tag", ParseErrorKind::UnexpectedTag),
            ("Unexpected open tag at end of body", ParseErrorKind::UnexpectedTag),
            ("Unacknowledged self-closing tag", ParseErrorKind::UnexpectedTag),
            ("Numeric character reference without digits", ParseErrorKind::CharacterReference),
            ("Invalid numeric character reference", ParseErrorKind::CharacterReference),
            ("Character reference does not end with semicolon", ParseErrorKind::CharacterReference),
            ("something new", ParseErrorKind::Other),
        ];
        for (message, kind) in pinned {
            assert_eq!(classify(message), kind, "{message}");
        }
    }

    #[test]
    fn test_reported_kinds() {
        let out = parse("<!DOCTYPE html><p a=1 a=2>");
        assert_eq!(out.errors[0].message, "Duplicate attribute");
        assert_eq!(out.errors[0].kind, ParseErrorKind::DuplicateAttribute);

        let out = parse("<!DOCTYPE html><p>hello</x>");
        assert_eq!(out.errors[0].message, "Found special tag while closing generic tag");
        assert_eq!(out.errors[0].kind, ParseErrorKind::UnexpectedTag);
    }
}
