//! Attribute installation
//!
//! The builders' attribute setter reads `prefix:local` names as namespaced,
//! which is wrong for the literal names HTML allows. Names containing a
//! colon are therefore installed in two phases: set under a free
//! placeholder key, then finalized under the literal name.

use crate::builder::DomBuilder;
use memchr::memchr;

/// Longest placeholder key tried
pub const MAX_KEY_LEN: u32 = 4;

const ALPHABET_LEN: u32 = 26;

/// Placeholder keys `a`..`z`, `aa`..`zz`, up to `zzzz`, in that order
#[derive(Debug, Clone, Default)]
pub struct DummyKeys {
    next: u32,
}

impl DummyKeys {
    pub fn new() -> Self {
        DummyKeys { next: 0 }
    }

    /// Number of keys produced before exhaustion
    pub fn capacity() -> u32 {
        (1..=MAX_KEY_LEN).map(|len| ALPHABET_LEN.pow(len)).sum()
    }
}

impl Iterator for DummyKeys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut rank = self.next;
        let mut len = 1;
        loop {
            let count = ALPHABET_LEN.pow(len);
            if rank < count {
                break;
            }
            rank -= count;
            len += 1;
            if len > MAX_KEY_LEN {
                return None;
            }
        }
        self.next += 1;

        let mut key = vec![b'a'; len as usize];
        for slot in key.iter_mut().rev() {
            *slot = b'a' + (rank % ALPHABET_LEN) as u8;
            rank /= ALPHABET_LEN;
        }
        String::from_utf8(key).ok()
    }
}

/// First placeholder key the element does not already carry
pub fn find_dummy_key<B: DomBuilder>(builder: &B, element: &B::Node) -> Option<String> {
    DummyKeys::new().find(|key| !builder.has_attribute(element, key))
}

/// Set `name` = `value` on `element` with `name` taken literally.
///
/// Returns `false` when the attribute could not be installed; the element
/// is then left without it.
pub fn install_attribute<B: DomBuilder>(
    builder: &mut B,
    element: &B::Node,
    name: &str,
    value: &str,
) -> bool {
    if memchr(b':', name.as_bytes()).is_none() {
        return builder.set_attribute(element, name, value);
    }

    let Some(key) = find_dummy_key(builder, element) else {
        log::warn!(target: "html5dom::convert", "no free placeholder key, dropping attribute {name}");
        return false;
    };
    if !builder.set_attribute(element, &key, value) {
        return false;
    }
    if builder.has_attribute(element, name) {
        builder.remove_attribute(element, name);
    }
    if !builder.finalize_attribute(element, &key, name) {
        log::warn!(target: "html5dom::convert", "placeholder {key} vanished before finalizing {name}");
        return false;
    }
    log::trace!(target: "html5dom::convert", "installed {name} via placeholder {key}");
    true
}
