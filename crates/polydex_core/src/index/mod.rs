//! The four parallel inverted indices.
//!
//! Every indexed field value contributes keys of the form
//! `"field:normalizedValue"` to four indices:
//!
//! - Exact: the full normalized value
//! - Prefix: every prefix up to a configured length
//! - N-gram: every contiguous gram of a configured length
//! - Phonetic: the Soundex code
//!
//! The four are always built together over the same record set. They are
//! kept in an [`IndexSet`] so nothing can rebuild one without the others.

mod inverted;
mod phonetic;
mod tokens;

pub use inverted::InvertedIndex;
pub use phonetic::soundex;
pub use tokens::{composite_key, index_keys, ngrams, prefixes, truncate_chars};

use serde::Serialize;

/// The kind of an inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Full normalized values.
    Exact,
    /// Leading substrings.
    Prefix,
    /// Contiguous fixed-length substrings.
    NGram,
    /// Soundex codes.
    Phonetic,
}

impl IndexKind {
    /// All kinds in a fixed order.
    pub const ALL: [IndexKind; 4] = [
        IndexKind::Exact,
        IndexKind::Prefix,
        IndexKind::NGram,
        IndexKind::Phonetic,
    ];
}

/// The four indices, owned together.
#[derive(Debug, Clone)]
pub struct IndexSet {
    exact: InvertedIndex,
    prefix: InvertedIndex,
    ngram: InvertedIndex,
    phonetic: InvertedIndex,
}

impl IndexSet {
    /// Creates four empty indices.
    pub fn new() -> Self {
        Self {
            exact: InvertedIndex::new(IndexKind::Exact),
            prefix: InvertedIndex::new(IndexKind::Prefix),
            ngram: InvertedIndex::new(IndexKind::NGram),
            phonetic: InvertedIndex::new(IndexKind::Phonetic),
        }
    }

    /// Returns the index of the given kind.
    pub fn get(&self, kind: IndexKind) -> &InvertedIndex {
        match kind {
            IndexKind::Exact => &self.exact,
            IndexKind::Prefix => &self.prefix,
            IndexKind::NGram => &self.ngram,
            IndexKind::Phonetic => &self.phonetic,
        }
    }

    fn get_mut(&mut self, kind: IndexKind) -> &mut InvertedIndex {
        match kind {
            IndexKind::Exact => &mut self.exact,
            IndexKind::Prefix => &mut self.prefix,
            IndexKind::NGram => &mut self.ngram,
            IndexKind::Phonetic => &mut self.phonetic,
        }
    }

    /// Iterates over the four indices in [`IndexKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &InvertedIndex> {
        [&self.exact, &self.prefix, &self.ngram, &self.phonetic].into_iter()
    }

    /// Adds every key to its index under `position`.
    pub fn insert_keys(&mut self, keys: &[(IndexKind, String)], position: usize) {
        for (kind, key) in keys {
            self.get_mut(*kind).insert(key.clone(), position);
        }
    }

    /// Retracts every key for `position`.
    pub fn remove_keys(&mut self, keys: &[(IndexKind, String)], position: usize) {
        for (kind, key) in keys {
            self.get_mut(*kind).remove(key, position);
        }
    }

    /// Renumbers positions after `removed` in all four indices.
    pub fn shift_down_after(&mut self, removed: usize) {
        for kind in IndexKind::ALL {
            self.get_mut(kind).shift_down_after(removed);
        }
    }

    /// Total distinct keys across the four indices.
    pub fn key_count(&self) -> usize {
        self.iter().map(InvertedIndex::key_count).sum()
    }

    /// Clears all four indices.
    pub fn clear(&mut self) {
        for kind in IndexKind::ALL {
            self.get_mut(kind).clear();
        }
    }
}

impl Default for IndexSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_keys_across_kinds() {
        let mut set = IndexSet::new();
        let keys = index_keys(&"name".into(), "alice", 10, 3);
        set.insert_keys(&keys, 0);

        assert_eq!(set.get(IndexKind::Exact).lookup("name:alice"), &[0]);
        assert_eq!(set.get(IndexKind::Prefix).lookup("name:al"), &[0]);
        assert_eq!(set.get(IndexKind::NGram).lookup("name:lic"), &[0]);
        assert_eq!(set.get(IndexKind::Phonetic).lookup("name:A420"), &[0]);

        set.remove_keys(&keys, 0);
        assert_eq!(set.key_count(), 0);
    }

    #[test]
    fn iter_follows_kind_order() {
        let set = IndexSet::new();
        let kinds: Vec<_> = set.iter().map(InvertedIndex::kind).collect();
        assert_eq!(kinds, IndexKind::ALL.to_vec());
    }

    #[test]
    fn clear_resets_everything() {
        let mut set = IndexSet::new();
        set.insert_keys(&index_keys(&"name".into(), "bob", 10, 3), 2);
        assert!(set.key_count() > 0);
        set.clear();
        assert_eq!(set.key_count(), 0);
    }
}
