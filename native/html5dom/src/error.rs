//! Crate error type

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The parser could not produce a tree at all
    Parser(String),
    /// A document resource's lock was poisoned by a panicking holder
    Poisoned,
    /// A handle did not refer to a live document
    NoDocument,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parser(reason) => write!(f, "parser failure: {reason}"),
            Error::Poisoned => f.write_str("document lock poisoned"),
            Error::NoDocument => f.write_str("no such document"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::Parser("input too large".into()).to_string(),
            "parser failure: input too large"
        );
        assert_eq!(Error::NoDocument.to_string(), "no such document");
    }
}
