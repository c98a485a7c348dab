//! String Interning Pool
//!
//! Deduplicated storage for element names, attribute names and values,
//! namespace URIs and character data. Every string is copied into a single
//! contiguous buffer and addressed by a `u32` ID.
//!
//! ID 0 is reserved for the empty string.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Location of an interned string inside the pool buffer: (offset, length)
#[derive(Debug, Clone, Copy)]
struct StringEntry(u32, u32);

/// String interning pool
///
/// Memory layout:
/// - `entries`: (offset, len) for each interned string ID
/// - `data`: buffer holding the bytes of every interned string
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
#[derive(Debug)]
pub struct StringPool {
    entries: Vec<StringEntry>,
    data: String,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: String::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for the empty string
        pool.entries.push(StringEntry(0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its ID.
    ///
    /// Interning the same content twice returns the same ID. Embedded NUL
    /// characters are stored like any other character.
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);

        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let offset = self.data.len() as u32;
        self.data.push_str(s);

        let id = self.entries.len() as u32;
        self.entries.push(StringEntry(offset, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);

        id
    }

    /// Look up the ID of an already interned string without interning it
    pub fn lookup(&self, s: &str) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        let ids = self.hash_index.get(&Self::compute_hash(s))?;
        ids.iter().copied().find(|&id| self.get(id) == Some(s))
    }

    /// Get a string by ID
    pub fn get(&self, id: u32) -> Option<&str> {
        let StringEntry(offset, len) = *self.entries.get(id as usize)?;
        let start = offset as usize;
        self.data.get(start..start + len as usize)
    }

    /// Get the number of unique strings stored (including the empty string)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool holds nothing but the reserved empty string
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Total bytes of string data held by the pool
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern() {
        let mut pool = StringPool::new();
        let id = pool.intern("hello");
        assert!(id > 0);
        assert_eq!(pool.get(id), Some("hello"));
    }

    #[test]
    fn test_intern_duplicate() {
        let mut pool = StringPool::new();
        let id1 = pool.intern("hello");
        let id2 = pool.intern("hello");
        assert_eq!(id1, id2);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_intern_different() {
        let mut pool = StringPool::new();
        let id1 = pool.intern("hello");
        let id2 = pool.intern("world");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(""), 0);
        assert_eq!(pool.get(0), Some(""));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let mut pool = StringPool::new();
        assert_eq!(pool.lookup("missing"), None);
        assert_eq!(pool.len(), 1);
        let id = pool.intern("present");
        assert_eq!(pool.lookup("present"), Some(id));
    }

    #[test]
    fn test_embedded_nul_and_long_strings() {
        let mut pool = StringPool::new();
        let id = pool.intern("a\0b");
        assert_eq!(pool.get(id).map(str::len), Some(3));

        let long = "x".repeat(70_000);
        let id = pool.intern(&long);
        assert_eq!(pool.get(id).map(str::len), Some(70_000));
    }
}
