//! Name-keyed, insertion-ordered record collections.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::record::Named;

/// Outcome of [`NamedCollection::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The record was stored.
    Inserted,
    /// A record with the same name already exists; the new one was dropped.
    Duplicate,
}

/// A set of records unique by name.
///
/// The first record stored under a name is kept for the lifetime of the
/// collection. Iteration yields records in insertion order. Serializes as a
/// plain sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCollection<T> {
    items: IndexMap<String, T>,
}

impl<T: Named> NamedCollection<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Stores `record` unless a record with the same name is present.
    pub fn insert_if_absent(&mut self, record: T) -> Insertion {
        if self.items.contains_key(record.name()) {
            return Insertion::Duplicate;
        }
        self.items.insert(record.name().to_string(), record);
        Insertion::Inserted
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Named> Default for NamedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a NamedCollection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl<T: Serialize> Serialize for NamedCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.values())
    }
}
