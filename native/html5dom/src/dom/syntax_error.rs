//! Syntax error records attached to parsed documents.

use std::fmt;

/// One diagnostic attached to a parsed document.
///
/// `domain`, `code` and `level` follow the host library's error ontology;
/// `error_type` is the parser's own raw classification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Rendered diagnostic, including the caret excerpt
    pub message: String,
    /// Source identifier supplied by the caller
    pub file: Option<String>,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
    /// Raw parser error type code
    pub error_type: u32,
    pub domain: i32,
    pub code: i32,
    pub level: i32,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SyntaxError {}
