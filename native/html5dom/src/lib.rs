//! Html5Dom - HTML5 parse trees converted into DOM documents
//!
//! Layers:
//! - parse: html5ever run into an owned parse tree plus errors
//! - convert: parse tree to DOM through a `DomBuilder`
//! - dom / object: the two target DOM libraries
//! - NIFs: parse, parse_batch and document accessors for the host VM

use rustler::types::atom::{error as error_atom, ok as ok_atom};
use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod builder;
pub mod config;
pub mod convert;
pub mod dom;
pub mod error;
pub mod object;
pub mod parallel;
pub mod parse;
mod resource;
mod term;

use builder::NativeBuilder;
use config::{Config, ParseOptions};
use parse::Html5everParser;
use resource::{DocumentHandle, DocumentResource};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                let mut peak = PEAK_ALLOCATED.load(Ordering::Relaxed);
                while current > peak {
                    match PEAK_ALLOCATED.compare_exchange_weak(
                        peak,
                        current,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => break,
                        Err(p) => peak = p,
                    }
                }
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Memory Tracking NIFs
// ============================================================================

#[cfg(feature = "memory_tracking")]
use std::sync::atomic::Ordering;

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory() -> usize {
    tracking::ALLOCATED.load(Ordering::SeqCst)
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    tracking::PEAK_ALLOCATED.load(Ordering::SeqCst)
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
    (current, peak)
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    (0, 0)
}

// ============================================================================
// Conversion
// ============================================================================

fn error_term<'a>(env: Env<'a>, e: error::Error) -> Term<'a> {
    (error_atom(), e.to_string()).encode(env)
}

/// Parse HTML into a document resource.
/// Returns `{:ok, doc}` or `{:error, reason}`; a negative `max_errors` is unlimited.
#[rustler::nif(name = "parse", schedule = "DirtyCpu")]
fn parse_html<'a>(env: Env<'a>, input: Binary<'a>, url: Option<String>, max_errors: i64) -> NifResult<Term<'a>> {
    let options = ParseOptions::with_host_limit(url.as_deref(), max_errors);
    let result = convert::parse_with::<_, NativeBuilder>(
        &Html5everParser::new(),
        input.as_slice(),
        &options,
        Config::global(),
    );
    match result {
        Ok(doc) => Ok((ok_atom(), ResourceArc::new(DocumentResource::new(doc))).encode(env)),
        Err(e) => Ok(error_term(env, e)),
    }
}

/// Parse several documents in parallel; one `{:ok, doc}` or `{:error, reason}` per input
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_batch<'a>(
    env: Env<'a>,
    inputs: Vec<Binary<'a>>,
    url: Option<String>,
    max_errors: i64,
) -> NifResult<Term<'a>> {
    let options = ParseOptions::with_host_limit(url.as_deref(), max_errors);
    let slices: Vec<&[u8]> = inputs.iter().map(|b| b.as_slice()).collect();
    let results = parallel::parse_batch(&slices, &options, Config::global());

    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        let term = match result {
            Ok(doc) => (ok_atom(), ResourceArc::new(DocumentResource::new(doc))).encode(env),
            Err(e) => error_term(env, e),
        };
        list = list.list_prepend(term);
    }
    Ok(list)
}

// ============================================================================
// Document Access
// ============================================================================

/// Root element as `{:element, name, attrs, children}`, or nil
#[rustler::nif]
fn document_root<'a>(env: Env<'a>, doc_ref: DocumentHandle) -> NifResult<Term<'a>> {
    match doc_ref.with_document(|doc| term::root_to_term(env, doc)) {
        Ok(term) => Ok(term),
        Err(e) => Ok(error_term(env, e)),
    }
}

/// Top-level nodes in document order: comments outside the root element
/// and the root element itself
#[rustler::nif]
fn document_children<'a>(env: Env<'a>, doc_ref: DocumentHandle) -> NifResult<Term<'a>> {
    match doc_ref.with_document(|doc| term::document_to_term(env, doc)) {
        Ok(term) => Ok(term),
        Err(e) => Ok(error_term(env, e)),
    }
}

/// Syntax errors as a list of maps, in source order
#[rustler::nif]
fn document_errors<'a>(env: Env<'a>, doc_ref: DocumentHandle) -> NifResult<Term<'a>> {
    match doc_ref.with_document(|doc| term::errors_to_term(env, doc.errors())) {
        Ok(term) => Ok(term),
        Err(e) => Ok(error_term(env, e)),
    }
}

/// `{name, public_id, system_id}` of the internal subset, or nil
#[rustler::nif]
fn document_doctype<'a>(env: Env<'a>, doc_ref: DocumentHandle) -> NifResult<Term<'a>> {
    match doc_ref.with_document(|doc| term::doctype_to_term(env, doc)) {
        Ok(term) => Ok(term),
        Err(e) => Ok(error_term(env, e)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.Html5Dom.Native");
