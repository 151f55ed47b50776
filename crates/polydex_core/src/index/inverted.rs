//! Inverted index: composite key to a set of record positions.

use super::IndexKind;
use std::collections::HashMap;

/// A single inverted index.
///
/// Each key maps to a sorted list of positions with set semantics: a
/// position appears at most once per key. Sorted lists keep lookup order
/// deterministic (ascending position) and make renumbering after a delete
/// a suffix walk.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    /// Which of the four index kinds this is.
    kind: IndexKind,
    /// Key to positions mapping.
    entries: HashMap<String, Vec<usize>>,
    /// Total position count across all keys.
    count: usize,
}

impl InvertedIndex {
    /// Creates an empty index.
    pub fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            count: 0,
        }
    }

    /// Returns the index kind.
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Adds `position` under `key`. Returns false if it was already present.
    pub fn insert(&mut self, key: String, position: usize) -> bool {
        let positions = self.entries.entry(key).or_default();
        match positions.binary_search(&position) {
            Ok(_) => false,
            Err(at) => {
                positions.insert(at, position);
                self.count += 1;
                true
            }
        }
    }

    /// Removes `position` from `key`, dropping the key once it is empty.
    pub fn remove(&mut self, key: &str, position: usize) -> bool {
        let Some(positions) = self.entries.get_mut(key) else {
            return false;
        };
        let Ok(at) = positions.binary_search(&position) else {
            return false;
        };
        positions.remove(at);
        self.count -= 1;
        if positions.is_empty() {
            self.entries.remove(key);
        }
        true
    }

    /// Returns the positions stored under `key`, in ascending order.
    pub fn lookup(&self, key: &str) -> &[usize] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Checks if the index contains a key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Renumbers every position greater than `removed` down by one.
    ///
    /// Callers must retract `removed` itself beforehand.
    pub fn shift_down_after(&mut self, removed: usize) {
        for positions in self.entries.values_mut() {
            let start = positions.partition_point(|&p| p <= removed);
            for position in &mut positions[start..] {
                *position -= 1;
            }
        }
    }

    /// Returns the number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the total number of key-position entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the summed length, in characters, of all keys.
    pub fn key_chars(&self) -> usize {
        self.entries.keys().map(|k| k.chars().count()).sum()
    }

    /// Iterates over keys and their positions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Clears the index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }
}
