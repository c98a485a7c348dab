//! Parser errors to syntax errors

use crate::config::Config;
use crate::dom::SyntaxError;
use crate::parse::{Html5Parser, ParseError};

/// Render each error with the parser's formatter, in emission order
pub fn translate_errors<P: Html5Parser + ?Sized>(
    parser: &P,
    errors: &[ParseError],
    input: &[u8],
    url: Option<&str>,
    config: &Config,
) -> Vec<SyntaxError> {
    errors
        .iter()
        .map(|error| SyntaxError {
            message: parser.format_error(error, input),
            file: url.map(str::to_string),
            line: error.position.line,
            column: error.position.reported_column(),
            error_type: error.kind.code(),
            domain: config.error_domain,
            code: config.error_code,
            level: config.error_level,
        })
        .collect()
}
