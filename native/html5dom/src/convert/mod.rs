//! Parse Tree Conversion
//!
//! Drives one conversion from source bytes to a finished DOM document:
//! - parse with an [`Html5Parser`]
//! - synthesize the document from the doctype
//! - walk the top-level children into the document
//! - translate and attach the parse errors
//! - drop the parse tree
//!
//! The only failure is the parser being unable to produce a tree; every
//! other problem degrades to a missing attribute or subset.

pub mod attribute;
pub mod diagnostic;
pub mod doctype;
pub mod namespace;
pub mod walker;

use crate::builder::{DefaultBuilder, DomBuilder};
use crate::config::{Config, ParseOptions};
use crate::error::Result;
use crate::parse::{Html5Parser, Html5everParser};

pub use attribute::{install_attribute, DummyKeys};
pub use diagnostic::translate_errors;
pub use doctype::new_document;
pub use walker::{build_element, walk};

/// Convert `input` with the given parser into the given builder's document
pub fn parse_with<P, B>(
    parser: &P,
    input: &[u8],
    options: &ParseOptions,
    config: &Config,
) -> Result<B::Output>
where
    P: Html5Parser + ?Sized,
    B: DomBuilder,
{
    log::debug!(target: "html5dom::convert", "parsing {} bytes", input.len());
    let output = parser.parse(input, options.error_limit(config))?;

    let tree = &output.document;
    let mut builder: B = new_document(tree.doctype_name(), tree.system_id(), tree.public_id());
    log::debug!(target: "html5dom::convert", "document synthesized, doctype {:?}", tree.doctype_name());

    for (index, child) in tree.children.iter().enumerate() {
        let Some(node) = walk(&mut builder, child) else {
            continue;
        };
        if tree.root == Some(index) {
            builder.set_root_element(&node);
        } else {
            builder.append_to_document(&node);
        }
    }
    log::debug!(target: "html5dom::convert", "walked {} top-level nodes", tree.children.len());

    let errors = translate_errors(parser, &output.errors, input, options.url.as_deref(), config);
    let document = builder.finish(errors);
    drop(output);
    log::debug!(target: "html5dom::convert", "conversion done");

    Ok(document)
}

/// Convert `input` with html5ever into the default builder's document
pub fn parse(
    input: &[u8],
    options: &ParseOptions,
) -> Result<<DefaultBuilder as DomBuilder>::Output> {
    parse_with::<_, DefaultBuilder>(&Html5everParser::new(), input, options, Config::global())
}
