// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Symbol interning.
//!
//! Names in both trees (method names, variable names, constant names) are interned once into a
//! process-wide table and handed around as a `Copy` id. Comparison is exact and case-sensitive.

use ahash::AHasher;
use arcstr::ArcStr;
use boxcar::Vec as BoxcarVec;
use once_cell::sync::Lazy;
use papaya::HashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Debug, Display},
    hash::{BuildHasherDefault, Hash, Hasher},
    sync::Mutex,
};

struct Interner {
    /// Name -> id.
    ids: HashMap<ArcStr, u32, BuildHasherDefault<AHasher>>,
    /// id as index -> name.
    names: BoxcarVec<ArcStr>,
    /// Serializes the reservation of a new id; lookups never take it.
    allocation_lock: Mutex<()>,
}

impl Interner {
    fn new() -> Self {
        Self {
            ids: Default::default(),
            names: BoxcarVec::new(),
            allocation_lock: Mutex::new(()),
        }
    }

    fn intern(&self, s: &str) -> u32 {
        let guard = self.ids.pin();
        if let Some(id) = guard.get(s) {
            return *id;
        }

        let _lock = self.allocation_lock.lock();

        // Another thread may have won the race while we waited.
        if let Some(id) = guard.get(s) {
            return *id;
        }

        let name = ArcStr::from(s);
        let id = self.names.push(name.clone()) as u32;
        guard.insert(name, id);
        id
    }

    fn name(&self, id: u32) -> Option<&ArcStr> {
        self.names.get(id as usize)
    }
}

static INTERNER: Lazy<Interner> = Lazy::new(Interner::new);

/// An interned name.
///
/// ```
/// use arbor_var::Symbol;
///
/// let a = Symbol::mk("foo");
/// assert_eq!(a, Symbol::mk("foo"));
/// assert_ne!(a, Symbol::mk("Foo"));
/// assert_eq!(a.as_str(), "foo");
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Symbol {
    id: u32,
}

impl Symbol {
    pub fn mk(s: &str) -> Self {
        Symbol {
            id: INTERNER.intern(s),
        }
    }

    pub fn as_arc_str(&self) -> ArcStr {
        INTERNER
            .name(self.id)
            .unwrap_or_else(|| panic!("Symbol: id {} not present in interner", self.id))
            .clone()
    }

    pub fn as_str(&self) -> &'static str {
        match INTERNER.name(self.id) {
            Some(name) => name.as_str(),
            None => panic!("Symbol: id {} not present in interner", self.id),
        }
    }

    pub fn as_string(&self) -> String {
        self.as_str().to_string()
    }

    /// A new symbol with `suffix` appended, e.g. the writer `foo=` for the reader `foo`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Symbol::mk(&format!("{}{suffix}", self.as_str()))
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.id == other.id {
            return std::cmp::Ordering::Equal;
        }
        self.as_str().cmp(other.as_str())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::mk(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::mk(&s)
    }
}

impl From<&String> for Symbol {
    fn from(s: &String) -> Self {
        Symbol::mk(s.as_str())
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(Symbol::mk(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_interning_is_stable() {
        let a = Symbol::mk("each_with_index");
        let b = Symbol::mk("each_with_index");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "each_with_index");
    }

    #[test]
    fn test_case_sensitive() {
        // `Foo` is a constant, `foo` a local; they must never collapse.
        assert_ne!(Symbol::mk("Foo"), Symbol::mk("foo"));
        assert_ne!(Symbol::mk("@a"), Symbol::mk("@A"));
    }

    #[test]
    fn test_with_suffix() {
        let reader = Symbol::mk("size");
        assert_eq!(reader.with_suffix("="), Symbol::mk("size="));
    }

    #[test]
    fn test_ordering_is_lexical() {
        let mut names = vec![Symbol::mk("c"), Symbol::mk("a"), Symbol::mk("b")];
        names.sort();
        let names: Vec<_> = names.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let sym = Symbol::mk("$stdout");
        let json = serde_json::to_string(&sym).unwrap();
        assert_eq!(json, "\"$stdout\"");
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sym);
    }

    #[test]
    fn test_concurrent_interning_agrees() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Symbol::mk("shared_between_threads")))
            .collect();
        let ids: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }
}
