//! Search index engine.
//!
//! [`SearchIndex`] owns the backing store, the field list and the four
//! parallel inverted indices. It is built explicitly with
//! [`SearchIndex::build_index`], queried with `search`, and kept current
//! with `update_index`.
//!
//! # Positions
//!
//! Records are addressed by their zero-based slot in the backing store.
//! Positions are stable handles only between rebuilds: a delete shifts every
//! later record down by one. Under [`RemovalStrategy::MarkForRebuild`] the
//! indices are not renumbered, so entries referring to shifted positions go
//! stale until the next rebuild.
//!
//! # Concurrency
//!
//! The engine does no internal locking. Mutating methods take `&mut self`;
//! hosts that share an index across threads wrap it in
//! [`SharedSearchIndex`](crate::SharedSearchIndex).

use crate::config::{IndexConfig, RemovalStrategy};
use crate::error::CoreResult;
use crate::index::{index_keys, IndexKind, IndexSet};
use crate::record::{normalize, FieldPath, Record};
use crate::stats::{estimate_memory, IndexStats, StatsCollector};
use std::time::Instant;
use tracing::debug;

/// Keys contributed by one record, kept for precise retraction.
pub(crate) type ForwardKeys = Vec<(IndexKind, String)>;

/// An in-memory, multi-strategy search index over records of type `R`.
pub struct SearchIndex<R> {
    /// Configuration.
    pub(crate) config: IndexConfig,
    /// Backing store, addressed by position.
    pub(crate) records: Vec<R>,
    /// Indexed field paths, in search order.
    pub(crate) fields: Vec<FieldPath>,
    /// The four inverted indices.
    pub(crate) indices: IndexSet,
    /// Position to contributed keys. Only maintained under
    /// [`RemovalStrategy::Precise`].
    pub(crate) forward: Vec<ForwardKeys>,
    /// Set once a build has completed with indexing enabled.
    pub(crate) ready: bool,
    /// Weighted change count since the last rebuild.
    pub(crate) pending_changes: u64,
    /// Running counters.
    pub(crate) stats: StatsCollector,
}

impl<R: Record> SearchIndex<R> {
    /// Creates an empty index with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(IndexConfig::default())
    }

    /// Creates an empty index with a validated configuration.
    pub fn with_config(config: IndexConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: IndexConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            fields: Vec::new(),
            indices: IndexSet::new(),
            forward: Vec::new(),
            ready: false,
            pending_changes: 0,
            stats: StatsCollector::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns true once the index can serve searches.
    pub fn is_ready(&self) -> bool {
        self.ready && self.config.enabled
    }

    /// Returns the backing store.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Returns the record at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&R> {
        self.records.get(position)
    }

    /// Returns the number of records in the backing store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the backing store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the indexed field paths.
    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    /// Returns the four inverted indices.
    pub fn indices(&self) -> &IndexSet {
        &self.indices
    }

    /// Returns the weighted change count since the last rebuild.
    pub fn pending_changes(&self) -> u64 {
        self.pending_changes
    }

    /// Builds all four indices over `records` for the given field paths.
    ///
    /// Any previous contents are discarded. The index becomes ready (unless
    /// indexing is disabled) and the weighted change counter resets to 0.
    pub fn build_index<F, S>(&mut self, records: Vec<R>, fields: F)
    where
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.records = records;
        self.fields = fields
            .into_iter()
            .map(|f| FieldPath::parse(f.as_ref()))
            .collect();
        self.rebuild();
    }

    /// Rebuilds all four indices over the current backing store.
    pub fn rebuild(&mut self) {
        let started = Instant::now();
        self.indices.clear();
        self.forward.clear();
        self.pending_changes = 0;

        if !self.config.enabled {
            self.ready = false;
            debug!(
                records = self.records.len(),
                "indexing disabled, skipping build"
            );
            return;
        }

        for position in 0..self.records.len() {
            self.index_position(position);
        }

        self.ready = true;
        let took = started.elapsed();
        self.stats.record_rebuild(took);

        debug!(
            records = self.records.len(),
            fields = self.fields.len(),
            keys = self.indices.key_count(),
            took_us = took.as_micros() as u64,
            "built search index"
        );
    }

    /// Discards the backing store, the indices and all counters.
    pub fn clear(&mut self) {
        self.records.clear();
        self.fields.clear();
        self.indices.clear();
        self.forward.clear();
        self.ready = false;
        self.pending_changes = 0;
        self.stats.reset();
    }

    /// Computes the keys the record at `position` contributes.
    pub(crate) fn keys_for(&self, position: usize) -> ForwardKeys {
        let Some(record) = self.records.get(position) else {
            return Vec::new();
        };

        let mut keys = Vec::new();
        for field in &self.fields {
            // Missing or non-scalar paths are skipped for this record.
            let Some(raw) = record.field_value(field) else {
                continue;
            };
            keys.extend(index_keys(
                field,
                &normalize(&raw),
                self.config.max_prefix_len,
                self.config.ngram_size,
            ));
        }
        keys
    }

    /// Indexes the record at `position` as an addition.
    ///
    /// Under the precise strategy the contributed keys are remembered so
    /// they can be retracted later.
    pub(crate) fn index_position(&mut self, position: usize) {
        let mut keys = self.keys_for(position);
        self.indices.insert_keys(&keys, position);

        if self.config.removal_strategy == RemovalStrategy::Precise {
            keys.sort_unstable();
            keys.dedup();
            if position < self.forward.len() {
                self.forward[position] = keys;
            } else {
                self.forward.resize_with(position, Vec::new);
                self.forward.push(keys);
            }
        }
    }

    /// Returns a statistics snapshot.
    pub fn stats(&self) -> IndexStats {
        IndexStats::collect(
            &self.indices,
            &self.stats,
            self.records.len(),
            self.pending_changes,
        )
    }

    /// Returns the estimated memory use in bytes.
    ///
    /// Exposed for external cache or eviction managers; the engine itself
    /// never evicts.
    pub fn memory_usage(&self) -> usize {
        estimate_memory(self.indices.key_count())
    }
}

impl<R: Record> Default for SearchIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for SearchIndex<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("records", &self.records.len())
            .field("fields", &self.fields)
            .field("ready", &self.ready)
            .field("keys", &self.indices.key_count())
            .field("pending_changes", &self.pending_changes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Alice", "city": "Paris"}),
            json!({"name": "Alicia", "city": "Lyon"}),
            json!({"name": "Bob"}),
        ]
    }

    #[test]
    fn build_populates_all_four_indices() {
        let mut index = SearchIndex::new();
        index.build_index(people(), ["name", "city"]);

        assert!(index.is_ready());
        assert_eq!(index.len(), 3);
        let indices = index.indices();
        assert_eq!(indices.get(IndexKind::Exact).lookup("name:alice"), &[0]);
        assert_eq!(indices.get(IndexKind::Prefix).lookup("name:alic"), &[0, 1]);
        assert_eq!(indices.get(IndexKind::NGram).lookup("name:bob"), &[2]);
        assert_eq!(indices.get(IndexKind::Phonetic).lookup("city:P620"), &[0]);
    }

    #[test]
    fn missing_fields_are_skipped() {
        let mut index = SearchIndex::new();
        index.build_index(people(), ["city", "address.zip"]);

        let exact = index.indices().get(IndexKind::Exact);
        // Bob has no city and nobody has an address.
        assert_eq!(exact.len(), 2);
        assert!(exact.iter().all(|(key, _)| key.starts_with("city:")));
    }

    #[test]
    fn rebuild_resets_pending_changes() {
        let mut index = SearchIndex::new();
        index.build_index(people(), ["name"]);
        index.pending_changes = 42;

        index.rebuild();
        assert_eq!(index.pending_changes(), 0);
        assert_eq!(index.stats().rebuilds, 2);
    }

    #[test]
    fn disabled_index_never_becomes_ready() {
        let mut index =
            SearchIndex::<Value>::with_config(IndexConfig::new().enabled(false)).unwrap();
        index.build_index(people(), ["name"]);

        assert!(!index.is_ready());
        assert_eq!(index.len(), 3);
        assert_eq!(index.indices().key_count(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = SearchIndex::<Value>::with_config(IndexConfig::new().ngram_size(0));
        assert!(result.is_err());
    }

    #[test]
    fn clear_discards_everything() {
        let mut index = SearchIndex::new();
        index.build_index(people(), ["name"]);
        index.clear();

        assert!(!index.is_ready());
        assert!(index.is_empty());
        assert_eq!(index.memory_usage(), 0);
        assert!(index.stats().last_rebuild.is_none());
    }

    #[test]
    fn precise_strategy_tracks_forward_keys() {
        let mut index = SearchIndex::with_config(IndexConfig::new().precise()).unwrap();
        index.build_index(people(), ["name"]);

        assert_eq!(index.forward.len(), 3);
        assert!(index.forward[2].contains(&(IndexKind::Exact, "name:bob".to_string())));
    }

    #[test]
    fn mark_for_rebuild_keeps_no_forward_index() {
        let mut index = SearchIndex::new();
        index.build_index(people(), ["name"]);
        assert!(index.forward.is_empty());
    }
}
