//! Builder over the arena tree

use super::DomBuilder;
use crate::dom::{Document, HtmlDocument, NodeId, SyntaxError};

/// Builds an [`HtmlDocument`] and wraps it into a [`Document`]
pub struct NativeBuilder {
    doc: HtmlDocument,
}

impl NativeBuilder {
    pub fn document(&self) -> &HtmlDocument {
        &self.doc
    }
}

impl DomBuilder for NativeBuilder {
    type Node = NodeId;
    type Output = Document;

    fn create_document(system_id: Option<&str>, public_id: Option<&str>) -> Self {
        NativeBuilder {
            doc: HtmlDocument::new(system_id, public_id),
        }
    }

    fn remove_internal_subset(&mut self) {
        self.doc.remove_internal_subset();
    }

    fn create_internal_subset(&mut self, name: &str, public_id: Option<&str>, system_id: Option<&str>) {
        if !self.doc.create_internal_subset(name, public_id, system_id) {
            log::warn!(target: "html5dom::builder", "internal subset already present, not replaced");
        }
    }

    fn rename_internal_subset(&mut self, name: &str) {
        self.doc.set_internal_subset_name(name);
    }

    fn create_element(&mut self, name: &str) -> NodeId {
        self.doc.create_element(name)
    }

    fn create_text(&mut self, data: &str) -> NodeId {
        self.doc.create_text(data)
    }

    fn create_cdata(&mut self, data: &str) -> NodeId {
        self.doc.create_cdata(data)
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.doc.create_comment(data)
    }

    fn has_attribute(&self, element: &NodeId, name: &str) -> bool {
        self.doc.has_attribute(*element, name)
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> bool {
        self.doc.set_attribute(*element, name, value).is_some()
    }

    fn remove_attribute(&mut self, element: &NodeId, name: &str) {
        self.doc.remove_attribute(*element, name);
    }

    fn finalize_attribute(&mut self, element: &NodeId, placeholder: &str, name: &str) -> bool {
        match self.doc.attribute_index(*element, placeholder) {
            Some(index) => self.doc.rename_attribute(*element, index, name),
            None => false,
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.doc.append_child(*parent, *child);
    }

    fn append_to_document(&mut self, node: &NodeId) {
        self.doc.append_child(crate::dom::DOCUMENT_NODE, *node);
    }

    fn set_root_element(&mut self, root: &NodeId) {
        self.doc.set_root_element(*root);
    }

    fn finish(self, errors: Vec<SyntaxError>) -> Document {
        Document::wrap(self.doc, errors)
    }
}
