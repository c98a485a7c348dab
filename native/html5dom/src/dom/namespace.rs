//! Namespace Resolution
//!
//! Prefix table used by the colon-aware attribute setter. The `xml` and
//! `xmlns` prefixes are always bound; further bindings can be declared on a
//! document.

use super::strings::StringPool;
use memchr::memchr;

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
}

/// Resolve one of the always-bound prefixes without a table
pub fn builtin_prefix(prefix: &str) -> Option<&'static str> {
    match prefix {
        "xml" => Some(ns::XML),
        "xmlns" => Some(ns::XMLNS),
        _ => None,
    }
}

/// Split a qualified name into prefix and local name at the first colon
pub fn split_qname(name: &str) -> (Option<&str>, &str) {
    match memchr(b':', name.as_bytes()) {
        Some(pos) if pos > 0 && pos + 1 < name.len() => (Some(&name[..pos]), &name[pos + 1..]),
        _ => (None, name),
    }
}

/// Namespace binding (prefix -> URI)
#[derive(Debug, Clone, Copy)]
struct NsBinding {
    prefix_id: u32,
    uri_id: u32,
}

/// Prefix table for one document
#[derive(Debug)]
pub struct NamespaceTable {
    bindings: Vec<NsBinding>,
    xml_prefix_id: u32,
    xmlns_prefix_id: u32,
}

impl NamespaceTable {
    /// Create a table with the pre-declared xml and xmlns namespaces
    pub fn new(strings: &mut StringPool) -> Self {
        let xml_prefix_id = strings.intern("xml");
        let xmlns_prefix_id = strings.intern("xmlns");
        let xml_uri_id = strings.intern(ns::XML);
        let xmlns_uri_id = strings.intern(ns::XMLNS);

        NamespaceTable {
            bindings: vec![
                NsBinding {
                    prefix_id: xml_prefix_id,
                    uri_id: xml_uri_id,
                },
                NsBinding {
                    prefix_id: xmlns_prefix_id,
                    uri_id: xmlns_uri_id,
                },
            ],
            xml_prefix_id,
            xmlns_prefix_id,
        }
    }

    /// Declare a namespace binding. Redeclaring xml or xmlns is ignored,
    /// redeclaring any other prefix replaces the earlier binding.
    pub fn declare(&mut self, prefix_id: u32, uri_id: u32) {
        if prefix_id == 0 || prefix_id == self.xml_prefix_id || prefix_id == self.xmlns_prefix_id {
            return;
        }
        match self.bindings.iter_mut().find(|b| b.prefix_id == prefix_id) {
            Some(binding) => binding.uri_id = uri_id,
            None => self.bindings.push(NsBinding { prefix_id, uri_id }),
        }
    }

    /// Resolve a prefix to a namespace URI ID
    pub fn resolve(&self, prefix_id: u32) -> Option<u32> {
        self.bindings
            .iter()
            .find(|b| b.prefix_id == prefix_id)
            .map(|b| b.uri_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespaces() {
        let mut strings = StringPool::new();
        let table = NamespaceTable::new(&mut strings);

        let xml_id = strings.intern("xml");
        let uri = table.resolve(xml_id).and_then(|id| strings.get(id));
        assert_eq!(uri, Some(ns::XML));
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut strings = StringPool::new();
        let mut table = NamespaceTable::new(&mut strings);

        let svg_prefix = strings.intern("svg");
        let svg_uri = strings.intern("http://www.w3.org/2000/svg");
        assert_eq!(table.resolve(svg_prefix), None);

        table.declare(svg_prefix, svg_uri);
        assert_eq!(table.resolve(svg_prefix), Some(svg_uri));
    }

    #[test]
    fn test_builtin_prefixes_cannot_be_rebound() {
        let mut strings = StringPool::new();
        let mut table = NamespaceTable::new(&mut strings);

        let xml_id = strings.intern("xml");
        let other = strings.intern("http://example.com/");
        table.declare(xml_id, other);
        assert_ne!(table.resolve(xml_id), Some(other));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("xml:lang"), (Some("xml"), "lang"));
        assert_eq!(split_qname("class"), (None, "class"));
        assert_eq!(split_qname(":odd"), (None, ":odd"));
        assert_eq!(split_qname("odd:"), (None, "odd:"));
    }

    #[test]
    fn test_builtin_prefix() {
        assert_eq!(builtin_prefix("xml"), Some(ns::XML));
        assert_eq!(builtin_prefix("xmlns"), Some(ns::XMLNS));
        assert_eq!(builtin_prefix("xlink"), None);
    }
}
