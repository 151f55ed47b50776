//! Incremental index maintenance.
//!
//! Data-source adapters translate their own mutations into an ordered batch
//! of [`Change`]s and hand it to `SearchIndex::update_index`. Each change
//! adds a weight to the pending-change counter; once the counter reaches the
//! configured rebuild threshold, the whole index is rebuilt over the current
//! backing store.
//!
//! # Consistency
//!
//! With [`RemovalStrategy::MarkForRebuild`] add-only workloads stay exact
//! between rebuilds, but updates leave the old value's keys behind and
//! deletes leave entries pointing at shifted positions. Those stale or
//! phantom hits persist until the next rebuild. Set `rebuild_threshold` to
//! 1, or use [`RemovalStrategy::Precise`], when that is not acceptable.

use crate::config::RemovalStrategy;
use crate::engine::SearchIndex;
use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Counter weight of an add.
pub const ADD_WEIGHT: u64 = 1;
/// Counter weight of an update.
pub const UPDATE_WEIGHT: u64 = 1;
/// Counter weight of a delete. Deletes shift positions and destabilize the
/// indices far more than additions.
pub const DELETE_WEIGHT: u64 = 10;

/// A single mutation of the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Change<R> {
    /// Append a record.
    Add {
        /// The new record.
        item: R,
    },
    /// Overwrite the record at `position`.
    Update {
        /// Slot to overwrite.
        position: usize,
        /// The replacement record.
        item: R,
    },
    /// Remove the record at `position`, shifting later records down.
    Delete {
        /// Slot to remove.
        position: usize,
    },
}

impl<R> Change<R> {
    /// Returns the weight this change adds to the pending-change counter.
    pub fn weight(&self) -> u64 {
        match self {
            Change::Add { .. } => ADD_WEIGHT,
            Change::Update { .. } => UPDATE_WEIGHT,
            Change::Delete { .. } => DELETE_WEIGHT,
        }
    }
}

/// Outcome of an `update_index` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UpdateReport {
    /// Changes applied to the backing store.
    pub applied: usize,
    /// Changes skipped because their position was out of range.
    pub skipped: usize,
    /// Whether the batch triggered a full rebuild.
    pub rebuilt: bool,
    /// Weighted change count after the batch (0 after a rebuild).
    pub pending_changes: u64,
}

impl<R: Record> SearchIndex<R> {
    /// Applies an ordered batch of changes to the backing store and indices.
    ///
    /// Fails with [`CoreError::IndexNotReady`] if the index has not been
    /// built. Out-of-range updates and deletes are skipped and do not count
    /// towards the rebuild threshold.
    pub fn update_index<I>(&mut self, changes: I) -> CoreResult<UpdateReport>
    where
        I: IntoIterator<Item = Change<R>>,
    {
        if !self.is_ready() {
            return Err(CoreError::index_not_ready(
                "build_index must be called before update_index",
            ));
        }

        let mut report = UpdateReport::default();
        for change in changes {
            let weight = change.weight();
            if self.apply_change(change) {
                self.pending_changes += weight;
                report.applied += 1;
            } else {
                report.skipped += 1;
            }
        }
        self.stats.record_changes(report.applied as u64);

        if self.pending_changes >= self.config.rebuild_threshold {
            debug!(
                pending = self.pending_changes,
                threshold = self.config.rebuild_threshold,
                "change threshold reached, rebuilding"
            );
            self.rebuild();
            report.rebuilt = true;
        }

        report.pending_changes = self.pending_changes;
        debug!(
            applied = report.applied,
            skipped = report.skipped,
            rebuilt = report.rebuilt,
            pending = report.pending_changes,
            "applied change batch"
        );
        Ok(report)
    }

    /// Applies one change. Returns false if it was skipped.
    fn apply_change(&mut self, change: Change<R>) -> bool {
        let precise = self.config.removal_strategy == RemovalStrategy::Precise;

        match change {
            Change::Add { item } => {
                self.records.push(item);
                self.index_position(self.records.len() - 1);
                true
            }
            Change::Update { position, item } => {
                if position >= self.records.len() {
                    warn!(position, len = self.records.len(), "update out of range, skipping");
                    return false;
                }
                if precise {
                    self.retract(position);
                }
                self.records[position] = item;
                self.index_position(position);
                true
            }
            Change::Delete { position } => {
                if position >= self.records.len() {
                    warn!(position, len = self.records.len(), "delete out of range, skipping");
                    return false;
                }
                self.records.remove(position);
                if precise {
                    self.retract(position);
                    if position < self.forward.len() {
                        self.forward.remove(position);
                    }
                    self.indices.shift_down_after(position);
                }
                true
            }
        }
    }

    /// Removes every key the record at `position` contributed.
    fn retract(&mut self, position: usize) {
        if let Some(keys) = self.forward.get_mut(position) {
            let keys = std::mem::take(keys);
            self.indices.remove_keys(&keys, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::query::{MatchMode, SearchOptions};
    use serde_json::{json, Value};

    fn names(names: &[&str]) -> Vec<Value> {
        names.iter().map(|n| json!({ "name": n })).collect()
    }

    fn built(config: IndexConfig) -> SearchIndex<Value> {
        let mut index = SearchIndex::with_config(config).unwrap();
        index.build_index(names(&["Alice", "Alicia", "Bob"]), ["name"]);
        index
    }

    fn prefix_hits(index: &SearchIndex<Value>, query: &str) -> Vec<usize> {
        index
            .search(query, &SearchOptions::new(MatchMode::Prefix))
            .unwrap()
            .iter()
            .map(|r| r.original_index)
            .collect()
    }

    #[test]
    fn update_before_build_fails() {
        let mut index = SearchIndex::<Value>::new();
        let err = index
            .update_index(vec![Change::Add { item: json!({}) }])
            .unwrap_err();
        assert!(err.is_not_ready());
    }

    #[test]
    fn adds_are_indexed_immediately() {
        let mut index = built(IndexConfig::default());
        let report = index
            .update_index(vec![Change::Add {
                item: json!({"name": "Alina"}),
            }])
            .unwrap();

        assert_eq!(report.applied, 1);
        assert!(!report.rebuilt);
        assert_eq!(report.pending_changes, ADD_WEIGHT);
        assert_eq!(prefix_hits(&index, "ali"), vec![0, 1, 3]);
    }

    #[test]
    fn deletes_weigh_ten() {
        let mut index = built(IndexConfig::default());
        let report = index
            .update_index(vec![Change::Delete { position: 2 }])
            .unwrap();
        assert_eq!(report.pending_changes, DELETE_WEIGHT);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn update_leaves_stale_keys_until_rebuild() {
        let mut index = built(IndexConfig::default());
        index
            .update_index(vec![Change::Update {
                position: 2,
                item: json!({"name": "Carol"}),
            }])
            .unwrap();

        // New value is searchable, but the old one still matches.
        assert_eq!(prefix_hits(&index, "car"), vec![2]);
        assert_eq!(prefix_hits(&index, "bob"), vec![2]);

        index.rebuild();
        assert!(prefix_hits(&index, "bob").is_empty());
    }

    #[test]
    fn stale_prefix_hits_survive_delete_until_rebuild() {
        let mut index = built(IndexConfig::default());
        index
            .update_index(vec![Change::Delete { position: 0 }])
            .unwrap();

        // Alice's slot is still indexed: position 0 (now Alicia) and
        // position 1 (now Bob, a phantom) both come back.
        let results = index
            .search("alic", &SearchOptions::new(MatchMode::Prefix))
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].original_index, 0);
        assert_eq!(results[1].item["name"], "Bob");

        index.rebuild();
        let results = index
            .search("alic", &SearchOptions::new(MatchMode::Prefix))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item["name"], "Alicia");
    }

    #[test]
    fn threshold_triggers_rebuild() {
        let mut index = built(IndexConfig::new().rebuild_threshold(12));

        let report = index
            .update_index(vec![Change::Delete { position: 0 }])
            .unwrap();
        assert!(!report.rebuilt);
        assert_eq!(index.pending_changes(), 10);

        let report = index
            .update_index(vec![
                Change::Add { item: json!({"name": "Dave"}) },
                Change::Add { item: json!({"name": "Alfred"}) },
            ])
            .unwrap();
        assert!(report.rebuilt);
        assert_eq!(report.pending_changes, 0);
        assert_eq!(index.stats().rebuilds, 2);

        // Fresh index: Alicia (0), Bob (1), Dave (2), Alfred (3).
        assert_eq!(prefix_hits(&index, "alic"), vec![0]);
        assert_eq!(prefix_hits(&index, "al"), vec![0, 3]);
    }

    #[test]
    fn threshold_of_one_rebuilds_every_batch() {
        let mut index = built(IndexConfig::new().rebuild_threshold(1));
        let report = index
            .update_index(vec![Change::Delete { position: 0 }])
            .unwrap();
        assert!(report.rebuilt);
        assert_eq!(prefix_hits(&index, "alic"), vec![0]);
    }

    #[test]
    fn out_of_range_changes_are_skipped() {
        let mut index = built(IndexConfig::default());
        let report = index
            .update_index(vec![
                Change::Delete { position: 9 },
                Change::Update {
                    position: 3,
                    item: json!({"name": "Zed"}),
                },
            ])
            .unwrap();

        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.pending_changes, 0);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn precise_delete_renumbers_positions() {
        let mut index = built(IndexConfig::default().precise());
        index
            .update_index(vec![Change::Delete { position: 0 }])
            .unwrap();

        let results = index
            .search("alic", &SearchOptions::new(MatchMode::Prefix))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].original_index, 0);
        assert_eq!(results[0].item["name"], "Alicia");
        assert_eq!(prefix_hits(&index, "bob"), vec![1]);
    }

    #[test]
    fn precise_update_retracts_old_value() {
        let mut index = built(IndexConfig::default().precise());
        index
            .update_index(vec![Change::Update {
                position: 2,
                item: json!({"name": "Carol"}),
            }])
            .unwrap();

        assert!(prefix_hits(&index, "bob").is_empty());
        assert_eq!(prefix_hits(&index, "car"), vec![2]);
    }

    #[test]
    fn changes_deserialize_from_json() {
        let changes: Vec<Change<Value>> = serde_json::from_str(
            r#"[
                {"type": "add", "position": 3, "item": {"name": "Eve"}},
                {"type": "update", "position": 0, "item": {"name": "Ann"}},
                {"type": "delete", "position": 1}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            changes,
            vec![
                Change::Add { item: json!({"name": "Eve"}) },
                Change::Update {
                    position: 0,
                    item: json!({"name": "Ann"}),
                },
                Change::Delete { position: 1 },
            ]
        );
    }
}
