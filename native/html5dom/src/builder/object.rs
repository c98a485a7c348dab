//! Builder over the object model

use super::DomBuilder;
use crate::dom::SyntaxError;
use crate::object::{DocumentRef, NodeRef};

/// Builds a [`DocumentRef`]; the finished document carries its errors as a
/// property
#[derive(Debug)]
pub struct ObjectModelBuilder {
    doc: DocumentRef,
}

impl ObjectModelBuilder {
    pub fn document(&self) -> &DocumentRef {
        &self.doc
    }
}

impl DomBuilder for ObjectModelBuilder {
    type Node = NodeRef;
    type Output = DocumentRef;

    fn create_document(system_id: Option<&str>, public_id: Option<&str>) -> Self {
        ObjectModelBuilder {
            doc: DocumentRef::new(system_id, public_id),
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

    fn create_element(&mut self, name: &str) -> NodeRef {
        self.doc.create_element(name)
    }

    fn create_text(&mut self, data: &str) -> NodeRef {
        self.doc.create_text_node(data)
    }

    fn create_cdata(&mut self, data: &str) -> NodeRef {
        self.doc.create_cdata_section(data)
    }

    fn create_comment(&mut self, data: &str) -> NodeRef {
        self.doc.create_comment(data)
    }

    fn has_attribute(&self, element: &NodeRef, name: &str) -> bool {
        element.has_attribute(name)
    }

    fn set_attribute(&mut self, element: &NodeRef, name: &str, value: &str) -> bool {
        element.set_attribute(name, value).is_some()
    }

    fn remove_attribute(&mut self, element: &NodeRef, name: &str) {
        element.remove_attribute(name);
    }

    fn finalize_attribute(&mut self, element: &NodeRef, placeholder: &str, name: &str) -> bool {
        match element.attribute(placeholder) {
            Some(attr) => {
                attr.set_name(name);
                true
            }
            None => false,
        }
    }

    fn append_child(&mut self, parent: &NodeRef, child: &NodeRef) {
        parent.add_child(child);
    }

    fn append_to_document(&mut self, node: &NodeRef) {
        self.doc.add_child(node);
    }

    fn set_root_element(&mut self, root: &NodeRef) {
        self.doc.set_root_element(root);
    }

    fn finish(self, errors: Vec<SyntaxError>) -> DocumentRef {
        self.doc.set_errors(errors);
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_always_starts_with_subset() {
        let mut b = ObjectModelBuilder::create_document(None, None);
        assert!(b.document().internal_subset().is_some());
        b.remove_internal_subset();
        assert!(b.document().internal_subset().is_none());
    }

    #[test]
    fn test_finalize_renames_attribute_object() {
        let mut b = ObjectModelBuilder::create_document(None, None);
        let el = b.create_element("p");
        assert!(b.set_attribute(&el, "b", "v"));
        let attr = el.attribute("b").unwrap();
        assert!(b.finalize_attribute(&el, "b", "q:x"));
        assert_eq!(attr.name(), "q:x");
        assert_eq!(attr.value(), "v");
        assert!(!b.finalize_attribute(&el, "b", "q:x"));
    }

    #[test]
    fn test_finish_sets_errors_property() {
        let b = ObjectModelBuilder::create_document(None, None);
        let error = SyntaxError {
            message: "1:1: bad".to_string(),
            file: None,
            line: 1,
            column: 1,
            error_type: 0,
            domain: 1,
            code: 1,
            level: 2,
        };
        let doc = b.finish(vec![error.clone()]);
        assert_eq!(doc.errors(), vec![error]);
    }
}
