//! DOM Builder Capability
//!
//! The operations the converter needs from a target DOM library. Two
//! backends implement it: [`NativeBuilder`] over the arena tree in
//! [`crate::dom`], and [`ObjectModelBuilder`] over the reference-counted
//! objects in [`crate::object`].

pub mod native;
pub mod object;

use crate::dom::SyntaxError;

pub use native::NativeBuilder;
pub use object::ObjectModelBuilder;

/// Builder selected at compile time
#[cfg(not(feature = "object-model"))]
pub type DefaultBuilder = NativeBuilder;

/// Builder selected at compile time
#[cfg(feature = "object-model")]
pub type DefaultBuilder = ObjectModelBuilder;

/// Target DOM operations used while converting a parse tree.
///
/// Nodes are created detached and attached exactly once. Identifier
/// arguments are named by role; note that `create_document` takes the
/// system identifier first while `create_internal_subset` takes the
/// public identifier first.
pub trait DomBuilder: Sized {
    /// Handle to a node of the document under construction
    type Node: Clone;
    /// Finished document
    type Output;

    /// Create an empty document.
    fn create_document(system_id: Option<&str>, public_id: Option<&str>) -> Self;

    fn remove_internal_subset(&mut self);

    fn create_internal_subset(&mut self, name: &str, public_id: Option<&str>, system_id: Option<&str>);

    fn rename_internal_subset(&mut self, name: &str);

    fn create_element(&mut self, name: &str) -> Self::Node;

    fn create_text(&mut self, data: &str) -> Self::Node;

    fn create_cdata(&mut self, data: &str) -> Self::Node;

    fn create_comment(&mut self, data: &str) -> Self::Node;

    /// Whether the element has an attribute stored under exactly `name`
    fn has_attribute(&self, element: &Self::Node, name: &str) -> bool;

    /// Colon-aware attribute setter. Returns `false` if the element
    /// refused the attribute.
    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> bool;

    fn remove_attribute(&mut self, element: &Self::Node, name: &str);

    /// Give the attribute stored under `placeholder` the literal name
    /// `name`, keeping its value. Returns `false` if no such attribute
    /// exists.
    fn finalize_attribute(&mut self, element: &Self::Node, placeholder: &str, name: &str) -> bool;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Attach a node at document level
    fn append_to_document(&mut self, node: &Self::Node);

    /// Attach a node at document level as the root element
    fn set_root_element(&mut self, root: &Self::Node);

    /// Attach the diagnostics and hand out the finished document
    fn finish(self, errors: Vec<SyntaxError>) -> Self::Output;
}
