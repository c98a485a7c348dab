//! Document synthesis
//!
//! Document constructors take the system identifier first. Internal subset
//! creation takes the public identifier first. Each primitive gets the
//! identifiers in its own order.

use crate::builder::DomBuilder;

/// Create the target document for a parse tree's doctype.
///
/// Without a doctype the document has no internal subset. A doctype with
/// neither identifier gets a bare subset under its name. Otherwise the
/// subset created from the identifiers is renamed to the doctype name.
pub fn new_document<B: DomBuilder>(
    doctype_name: Option<&str>,
    system_id: Option<&str>,
    public_id: Option<&str>,
) -> B {
    let Some(name) = doctype_name else {
        let mut builder = B::create_document(None, None);
        builder.remove_internal_subset();
        return builder;
    };

    if system_id.is_none() && public_id.is_none() {
        let mut builder = B::create_document(None, None);
        builder.remove_internal_subset();
        builder.create_internal_subset(name, None, None);
        return builder;
    }

    let mut builder = B::create_document(system_id, public_id);
    builder.rename_internal_subset(name);
    builder
}
