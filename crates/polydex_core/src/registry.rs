//! Caller-owned registry of named search indexes.

use crate::config::IndexConfig;
use crate::engine::SearchIndex;
use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use std::collections::BTreeMap;

/// A map of named [`SearchIndex`] instances.
///
/// There is no process-wide registry; whoever needs named indexes owns one
/// of these.
pub struct IndexRegistry<R> {
    indexes: BTreeMap<String, SearchIndex<R>>,
}

impl<R: Record> IndexRegistry<R> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indexes: BTreeMap::new(),
        }
    }

    /// Creates a new named index.
    ///
    /// Fails if the name is taken or the configuration is invalid.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        config: IndexConfig,
    ) -> CoreResult<&mut SearchIndex<R>> {
        let name = name.into();
        if self.indexes.contains_key(&name) {
            return Err(CoreError::index_already_exists(name));
        }
        let index = SearchIndex::with_config(config)?;
        Ok(self.indexes.entry(name).or_insert(index))
    }

    /// Returns the named index, creating it with `config` if missing.
    pub fn get_or_create(
        &mut self,
        name: impl Into<String>,
        config: IndexConfig,
    ) -> CoreResult<&mut SearchIndex<R>> {
        let name = name.into();
        if !self.indexes.contains_key(&name) {
            let index = SearchIndex::with_config(config)?;
            self.indexes.insert(name.clone(), index);
        }
        self.indexes
            .get_mut(&name)
            .ok_or_else(|| CoreError::index_not_found(name))
    }

    /// Returns the named index.
    pub fn get(&self, name: &str) -> Option<&SearchIndex<R>> {
        self.indexes.get(name)
    }

    /// Returns the named index mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SearchIndex<R>> {
        self.indexes.get_mut(name)
    }

    /// Removes and returns the named index.
    pub fn remove(&mut self, name: &str) -> CoreResult<SearchIndex<R>> {
        self.indexes
            .remove(name)
            .ok_or_else(|| CoreError::index_not_found(name))
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    /// Returns the number of registered indexes.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Returns true if no index is registered.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Sums the memory estimates of every registered index.
    pub fn total_memory_usage(&self) -> usize {
        self.indexes.values().map(SearchIndex::memory_usage).sum()
    }
}

impl<R: Record> Default for IndexRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}
