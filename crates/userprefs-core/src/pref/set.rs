//! The loaded, immutable preference set.
//!
//! A [`PreferenceSet`] is built once from a sequence of [`Declaration`]s and
//! never mutated afterwards.  If the source file changes, load a new set and
//! drop the old one.
//!
//! # Duplicate keys
//!
//! Later declarations of a key overwrite earlier ones (last-write-wins), which
//! is how browsers apply `user.js`.  The overwritten entry keeps its original
//! *position* so iteration order is the order in which keys first appeared,
//! but its value, kind and line number come from the last declaration.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::loader::Loader;
use crate::pref::parser::{Declaration, ParseError};
use crate::pref::value::{PrefKind, PrefValue};

/// One resolved preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    pub key: String,
    pub value: PrefValue,
    /// Function of the winning declaration.
    pub kind: PrefKind,
    /// Source line of the winning declaration.
    pub line: usize,
}

impl From<Declaration> for Preference {
    fn from(decl: Declaration) -> Self {
        Self {
            key: decl.key,
            value: decl.value,
            kind: decl.kind,
            line: decl.line,
        }
    }
}

/// An ordered, immutable mapping from preference key to typed value.
///
/// # Examples
///
/// ```rust
/// use userprefs_core::PreferenceSet;
///
/// let set: PreferenceSet = r#"
///     user_pref("browser.uidensity", 1);
///     user_pref("general.smoothScroll", true);
///     user_pref("browser.uidensity", 0);
/// "#
/// .parse()
/// .unwrap();
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.get_int("browser.uidensity"), Some(0));
/// assert_eq!(set.get_bool("general.smoothScroll"), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSet {
    entries: Vec<Preference>,
    index: HashMap<String, usize>,
}

impl PreferenceSet {
    /// Parses `src` strictly: the first malformed line aborts the load.
    ///
    /// Use [`Loader`] with [`crate::ErrorPolicy::SkipInvalid`] to keep going
    /// past bad lines instead.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        Loader::new().load_str(src).map(|outcome| outcome.set)
    }

    /// Looks up a preference value by key.
    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.entry(key).map(|p| &p.value)
    }

    /// Looks up the full entry (value, kind and source line) for a key.
    pub fn entry(&self, key: &str) -> Option<&Preference> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Returns the value only if it is a boolean preference.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PrefValue::as_bool)
    }

    /// Returns the value only if it is an integer preference.
    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(PrefValue::as_int)
    }

    /// Returns the value only if it is a string preference.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PrefValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in first-declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Preference> {
        self.entries.iter()
    }

    /// Iterates keys in first-declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.key.as_str())
    }

    /// Copies the set into a sorted key → value map for hosts that only want
    /// the mapping.
    pub fn to_map(&self) -> BTreeMap<String, PrefValue> {
        self.entries
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect()
    }

    fn insert(&mut self, pref: Preference) {
        match self.index.get(&pref.key) {
            Some(&i) => self.entries[i] = pref,
            None => {
                self.index.insert(pref.key.clone(), self.entries.len());
                self.entries.push(pref);
            }
        }
    }
}

impl FromIterator<Declaration> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut set = PreferenceSet::default();
        for decl in iter {
            set.insert(decl.into());
        }
        set
    }
}

impl FromStr for PreferenceSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceSet::parse(s)
    }
}

impl<'a> IntoIterator for &'a PreferenceSet {
    type Item = &'a Preference;
    type IntoIter = std::slice::Iter<'a, Preference>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serializes as a flat key → value map in declaration order.
impl Serialize for PreferenceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for pref in &self.entries {
            map.serialize_entry(&pref.key, &pref.value)?;
        }
        map.end()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
