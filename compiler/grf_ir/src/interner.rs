//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. Interior locking lets every phase
//! intern through a shared reference. The interner owns its strings, so
//! they are freed together with it.

use std::sync::Arc;

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Storage for interned strings.
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<Arc<str>, u32>,
    /// Storage for string contents; shares its allocations with `map`.
    strings: Vec<Arc<str>>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Table exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// String interner.
///
/// One interner lives for one compilation run; a `Name` is only meaningful
/// together with the interner that produced it.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner holding only the empty string.
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), 0);
        StringInterner {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: check if already interned
        {
            let guard = self.table.read();
            if let Some(&index) = guard.map.get(s) {
                return Ok(Name::from_raw(index));
            }
        }

        let mut guard = self.table.write();
        if let Some(&index) = guard.map.get(s) {
            return Ok(Name::from_raw(index));
        }

        let index = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        let owned: Arc<str> = Arc::from(s);
        guard.strings.push(Arc::clone(&owned));
        guard.map.insert(owned, index);
        Ok(Name::from_raw(index))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity (over 4 billion strings).
    /// Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the string for a Name.
    ///
    /// Only names produced by this interner are meaningful. A name from
    /// another interner returns whatever this one stored at the same index,
    /// or `"<unknown>"` when the index is past the end of the table.
    pub fn lookup(&self, name: Name) -> Arc<str> {
        let guard = self.table.read();
        match guard.strings.get(name.raw() as usize) {
            Some(text) => Arc::clone(text),
            None => Arc::from("<unknown>"),
        }
    }

    /// Get the number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if the interner holds nothing but the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_text_interns_to_equal_name() {
        let interner = StringInterner::new();
        let a = interner.intern("ground");
        let b = interner.intern("ground");
        let c = interner.intern("building");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(&*interner.lookup(c), "building");
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert!(interner.is_empty());
        assert_eq!(interner.intern(""), Name::EMPTY);
        interner.intern("x");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn out_of_range_name_resolves_to_placeholder() {
        let interner = StringInterner::new();
        assert_eq!(&*interner.lookup(Name::from_raw(99)), "<unknown>");
    }

    #[test]
    fn strings_are_owned_by_the_interner() {
        let interner = StringInterner::new();
        let name = interner.intern("ground");
        let text = interner.lookup(name);
        // Table entry, map key and `text`.
        assert_eq!(Arc::strong_count(&text), 3);

        drop(interner);
        assert_eq!(Arc::strong_count(&text), 1);
        assert_eq!(&*text, "ground");
    }
}
