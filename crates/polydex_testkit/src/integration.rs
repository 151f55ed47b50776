//! Integration test helpers.
//!
//! [`IntegrationHarness`] drives a [`SearchIndex`] alongside a shadow copy
//! of its backing store, so search results can be checked against the
//! brute-force oracle at any point.

use crate::oracle::{oracle_scores, result_scores, scores_match, ScoreMap};
use polydex_core::{Change, IndexConfig, MatchMode, SearchIndex, SearchOptions, UpdateReport};
use serde_json::Value;

/// A search index paired with an independently maintained record list.
pub struct IntegrationHarness {
    /// The index under test.
    pub index: SearchIndex<Value>,
    shadow: Vec<Value>,
    fields: Vec<String>,
}

impl IntegrationHarness {
    /// Builds an index over `records` with the given configuration.
    pub fn new(config: IndexConfig, records: Vec<Value>, fields: &[&str]) -> Self {
        let mut index = SearchIndex::with_config(config).expect("Invalid test configuration");
        index.build_index(records.clone(), fields.iter().copied());
        Self {
            index,
            shadow: records,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Applies a batch to both the index and the shadow store.
    pub fn apply(&mut self, changes: Vec<Change<Value>>) -> UpdateReport {
        for change in &changes {
            match change {
                Change::Add { item } => self.shadow.push(item.clone()),
                Change::Update { position, item } => {
                    if let Some(slot) = self.shadow.get_mut(*position) {
                        *slot = item.clone();
                    }
                }
                Change::Delete { position } => {
                    if *position < self.shadow.len() {
                        self.shadow.remove(*position);
                    }
                }
            }
        }
        self.index
            .update_index(changes)
            .expect("Failed to apply changes")
    }

    /// Returns the shadow store.
    pub fn shadow(&self) -> &[Value] {
        &self.shadow
    }

    /// Runs a case-insensitive search and returns its scores.
    pub fn search_scores(&self, query: &str, mode: MatchMode) -> ScoreMap {
        let results = self
            .index
            .search(query, &SearchOptions::new(mode))
            .expect("Search failed");
        result_scores(&results)
    }

    /// Computes what a fresh index over the shadow store would return.
    pub fn expected_scores(&self, query: &str, mode: MatchMode) -> ScoreMap {
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        oracle_scores(
            &self.shadow,
            &fields,
            query,
            mode,
            self.index.config().ngram_size,
        )
    }

    /// Asserts that the index agrees with the oracle for `query` in every
    /// match mode.
    pub fn verify(&self, query: &str) {
        assert_eq!(
            self.index.records(),
            self.shadow.as_slice(),
            "Backing store diverged from shadow"
        );
        for mode in [
            MatchMode::Exact,
            MatchMode::Prefix,
            MatchMode::Partial,
            MatchMode::Fuzzy,
        ] {
            let actual = self.search_scores(query, mode);
            let expected = self.expected_scores(query, mode);
            assert!(
                scores_match(&actual, &expected),
                "Mode {mode} query {query:?}: index {actual:?}, oracle {expected:?}"
            );
        }
    }
}
