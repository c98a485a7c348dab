//! Caret diagnostics
//!
//! ```text
//! 3:5: Unexpected token
//! <p><b</p>
//!     ^
//! ```
//!
//! Without a known column the header drops the column and no caret is
//! drawn.

use super::ParseError;
use memchr::memchr;

/// Render `error` as a header line, the offending source line and a caret
/// under the error column
pub fn format_error(error: &ParseError, input: &[u8]) -> String {
    let pos = error.position;
    let mut out = match pos.column {
        Some(column) => format!("{}:{}: {}", pos.line, column, error.message),
        None => format!("{}: {}", pos.line, error.message),
    };

    let Some(rest) = input.get(pos.offset..) else {
        return out;
    };
    let end = memchr(b'\n', rest).unwrap_or(rest.len());
    let line = String::from_utf8_lossy(&rest[..end]);
    let line = line.trim_end_matches('\r');

    out.push('\n');
    out.push_str(line);
    let Some(column) = pos.column else {
        return out;
    };
    out.push('\n');
    for c in line.chars().take(column.saturating_sub(1) as usize) {
        out.push(if c == '\t' { '\t' } else { ' ' });
    }
    out.push('^');
    out
}
