//! DOM Module - Arena-based HTML Document
//!
//! The native-tree DOM library driven by the converter:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names, values and character data
//! - Prefix table for the colon-aware attribute setter
//! - Internal subset (DOCTYPE) create / remove / rename

pub mod document;
pub mod namespace;
pub mod node;
pub mod strings;
pub mod syntax_error;

pub use document::{Document, DocumentType, HtmlDocument};
pub use node::{DomAttribute, DomNode, NodeId, NodeKind, DOCUMENT_NODE};
pub use strings::StringPool;
pub use syntax_error::SyntaxError;
