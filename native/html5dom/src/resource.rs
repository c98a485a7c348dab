//! ResourceArc Wrappers
//!
//! Converted documents handed to the host VM.

use crate::dom::Document;
use crate::error::Error;
use rustler::ResourceArc;
use std::sync::Mutex;

/// A converted document stored in a ResourceArc.
/// The tree is built once; later calls only read it.
pub struct DocumentResource {
    pub doc: Mutex<Option<Document>>,
}

impl DocumentResource {
    pub fn new(doc: Document) -> Self {
        DocumentResource {
            doc: Mutex::new(Some(doc)),
        }
    }

    /// Run `f` against the stored document.
    ///
    /// # Errors
    ///
    /// [`Error::Poisoned`] if the document mutex is poisoned,
    /// or [`Error::NoDocument`] if no document is present.
    pub fn with_document<F, R>(&self, f: F) -> Result<R, Error>
    where
        F: FnOnce(&Document) -> R,
    {
        let guard = self.doc.lock().map_err(|_| Error::Poisoned)?;
        let doc = guard.as_ref().ok_or(Error::NoDocument)?;
        Ok(f(doc))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

impl Default for DocumentResource {
    fn default() -> Self {
        DocumentResource {
            doc: Mutex::new(None),
        }
    }
}

/// Type alias for document ResourceArc
pub type DocumentHandle = ResourceArc<DocumentResource>;
