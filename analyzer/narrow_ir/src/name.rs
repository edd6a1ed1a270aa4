//! Interned identifiers.
//!
//! Trees are built single-threaded per translation unit and immutable
//! afterwards, so a plain map-backed interner is enough; analysis threads
//! only ever call the read side.

use rustc_hash::FxHashMap;

/// Interned identifier. Equality and hashing are O(1) index comparisons.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    /// Raw index, for debug output.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// String interner owned by one `SyntaxTree`.
#[derive(Default, Debug, Clone)]
pub struct Interner {
    map: FxHashMap<Box<str>, Name>,
    strings: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Interner::default()
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        // Interned count is bounded by source size, which Span already
        // caps at u32::MAX bytes.
        let name = Name(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        self.strings.push(s.into());
        self.map.insert(s.into(), name);
        name
    }

    /// Look up the string for a `Name`.
    ///
    /// Returns the empty string for a `Name` from a different interner;
    /// mixing interners is a host bug the analysis must not panic on.
    pub fn resolve(&self, name: Name) -> &str {
        self.strings
            .get(name.0 as usize)
            .map_or("", AsRef::as_ref)
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let mut interner = Interner::new();
        let a = interner.intern("use_count");
        let b = interner.intern("swap");
        let a2 = interner.intern("use_count");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_resolve() {
        let mut interner = Interner::new();
        let name = interner.intern("make_shared");
        assert_eq!(interner.resolve(name), "make_shared");
    }

    #[test]
    fn test_resolve_foreign_name_is_empty() {
        let mut a = Interner::new();
        let name = a.intern("x");
        let _ = a.intern("y");
        let b = Interner::new();
        assert_eq!(b.resolve(name), "");
    }
}
