//! Attribute namespace prefixes

use crate::parse::{Attribute, AttributeNamespace};
use std::borrow::Cow;

/// Prefix written in front of an attribute's local name.
///
/// A namespace declaration named exactly `xmlns` declares the default
/// namespace and takes no prefix.
pub fn attribute_prefix(namespace: AttributeNamespace, name: &str) -> &'static str {
    match namespace {
        AttributeNamespace::None => "",
        AttributeNamespace::XLink => "xlink:",
        AttributeNamespace::Xml => "xml:",
        AttributeNamespace::Xmlns if name == "xmlns" => "",
        AttributeNamespace::Xmlns => "xmlns:",
    }
}

/// Name the attribute is installed under
pub fn qualified_name(attr: &Attribute) -> Cow<'_, str> {
    match attribute_prefix(attr.namespace, &attr.name) {
        "" => Cow::Borrowed(attr.name.as_str()),
        prefix => Cow::Owned(format!("{prefix}{}", attr.name)),
    }
}
