//! Index statistics and memory estimation.
//!
//! [`StatsCollector`] holds the running counters (rebuilds, searches,
//! applied changes, build timing). [`IndexStats`] is the point-in-time
//! snapshot returned by `SearchIndex::stats`, which also carries the
//! structural counts read from the four indices.
//!
//! The memory figure is an estimate (a fixed per-key overhead times the key
//! count) meant for an external cache or eviction manager. The engine never
//! evicts on its own.

use crate::index::{IndexKind, IndexSet};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Estimated bytes consumed per distinct key, across all four indices.
pub const ESTIMATED_BYTES_PER_KEY: usize = 100;

/// Running counters for a search index.
///
/// Counters are atomic so `search(&self)` can record itself.
#[derive(Debug, Default)]
pub struct StatsCollector {
    /// Number of full rebuilds.
    rebuilds: AtomicU64,
    /// Number of searches served.
    searches: AtomicU64,
    /// Number of changes applied through `update_index`.
    changes_applied: AtomicU64,
    /// Duration of the last build in nanoseconds.
    last_build_nanos: AtomicU64,
    /// Wall-clock time of the last rebuild, in nanoseconds since the epoch.
    /// Zero means never.
    last_rebuild_nanos: AtomicU64,
}

impl StatsCollector {
    /// Creates a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed rebuild.
    pub(crate) fn record_rebuild(&self, took: Duration) {
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        self.last_build_nanos
            .store(saturating_nanos(took), Ordering::Relaxed);
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.last_rebuild_nanos
            .store(saturating_nanos(since_epoch).max(1), Ordering::Relaxed);
    }

    /// Records a served search.
    pub(crate) fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Records applied changes.
    pub(crate) fn record_changes(&self, count: u64) {
        self.changes_applied.fetch_add(count, Ordering::Relaxed);
    }

    /// Resets every counter.
    pub(crate) fn reset(&self) {
        self.rebuilds.store(0, Ordering::Relaxed);
        self.searches.store(0, Ordering::Relaxed);
        self.changes_applied.store(0, Ordering::Relaxed);
        self.last_build_nanos.store(0, Ordering::Relaxed);
        self.last_rebuild_nanos.store(0, Ordering::Relaxed);
    }

    /// Returns the number of full rebuilds.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Returns the number of searches served.
    pub fn searches(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    /// Returns the number of changes applied.
    pub fn changes_applied(&self) -> u64 {
        self.changes_applied.load(Ordering::Relaxed)
    }

    /// Returns how long the last build took.
    pub fn last_build_duration(&self) -> Duration {
        Duration::from_nanos(self.last_build_nanos.load(Ordering::Relaxed))
    }

    /// Returns when the last rebuild finished, if one has happened.
    pub fn last_rebuild(&self) -> Option<SystemTime> {
        match self.last_rebuild_nanos.load(Ordering::Relaxed) {
            0 => None,
            nanos => Some(UNIX_EPOCH + Duration::from_nanos(nanos)),
        }
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Key counts of each index kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct KeysPerKind {
    /// Keys in the exact index.
    pub exact: usize,
    /// Keys in the prefix index.
    pub prefix: usize,
    /// Keys in the n-gram index.
    pub ngram: usize,
    /// Keys in the phonetic index.
    pub phonetic: usize,
}

/// A point-in-time snapshot of index statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    /// Records in the backing store.
    pub record_count: usize,
    /// Sum of exact-index bucket sizes.
    pub total_entries: usize,
    /// Distinct keys summed over all four indices.
    pub unique_keys: usize,
    /// Per-kind key counts.
    pub keys_per_kind: KeysPerKind,
    /// Mean key length in characters (0.0 when empty).
    pub average_key_length: f64,
    /// Estimated memory use in bytes.
    pub memory_usage: usize,
    /// When the last rebuild finished.
    pub last_rebuild: Option<SystemTime>,
    /// How long the last build took.
    pub last_build_duration: Duration,
    /// Number of full rebuilds.
    pub rebuilds: u64,
    /// Number of searches served.
    pub searches: u64,
    /// Number of changes applied.
    pub changes_applied: u64,
    /// Weighted change count since the last rebuild.
    pub pending_changes: u64,
}

impl IndexStats {
    /// Builds a snapshot from the indices and the running counters.
    pub(crate) fn collect(
        indices: &IndexSet,
        collector: &StatsCollector,
        record_count: usize,
        pending_changes: u64,
    ) -> Self {
        let unique_keys = indices.key_count();
        let key_chars: usize = indices.iter().map(|index| index.key_chars()).sum();
        let average_key_length = if unique_keys == 0 {
            0.0
        } else {
            key_chars as f64 / unique_keys as f64
        };

        Self {
            record_count,
            total_entries: indices.get(IndexKind::Exact).len(),
            unique_keys,
            keys_per_kind: KeysPerKind {
                exact: indices.get(IndexKind::Exact).key_count(),
                prefix: indices.get(IndexKind::Prefix).key_count(),
                ngram: indices.get(IndexKind::NGram).key_count(),
                phonetic: indices.get(IndexKind::Phonetic).key_count(),
            },
            average_key_length,
            memory_usage: estimate_memory(unique_keys),
            last_rebuild: collector.last_rebuild(),
            last_build_duration: collector.last_build_duration(),
            rebuilds: collector.rebuilds(),
            searches: collector.searches(),
            changes_applied: collector.changes_applied(),
            pending_changes,
        }
    }
}

/// Estimates memory use for `key_count` distinct keys.
pub fn estimate_memory(key_count: usize) -> usize {
    key_count.saturating_mul(ESTIMATED_BYTES_PER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::index_keys;

    #[test]
    fn default_stats_are_zero() {
        let stats = StatsCollector::new();
        assert_eq!(stats.rebuilds(), 0);
        assert_eq!(stats.searches(), 0);
        assert_eq!(stats.last_build_duration(), Duration::ZERO);
        assert!(stats.last_rebuild().is_none());
    }

    #[test]
    fn record_rebuild_sets_timestamp() {
        let stats = StatsCollector::new();
        stats.record_rebuild(Duration::from_millis(3));

        assert_eq!(stats.rebuilds(), 1);
        assert_eq!(stats.last_build_duration(), Duration::from_millis(3));
        assert!(stats.last_rebuild().is_some());

        stats.reset();
        assert!(stats.last_rebuild().is_none());
    }

    #[test]
    fn concurrent_search_counting() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(StatsCollector::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        s.record_search();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.searches(), 800);
    }

    #[test]
    fn snapshot_counts_keys() {
        let mut indices = IndexSet::new();
        indices.insert_keys(&index_keys(&"name".into(), "bob", 10, 3), 0);
        indices.insert_keys(&index_keys(&"name".into(), "bob", 10, 3), 1);

        let snapshot = IndexStats::collect(&indices, &StatsCollector::new(), 2, 0);

        // exact: name:bob -> [0, 1]
        assert_eq!(snapshot.total_entries, 2);
        assert_eq!(snapshot.keys_per_kind.exact, 1);
        // b, bo, bob
        assert_eq!(snapshot.keys_per_kind.prefix, 3);
        assert_eq!(snapshot.keys_per_kind.ngram, 1);
        assert_eq!(snapshot.keys_per_kind.phonetic, 1);
        assert_eq!(snapshot.unique_keys, 6);
        assert_eq!(snapshot.memory_usage, 6 * ESTIMATED_BYTES_PER_KEY);
        assert!(snapshot.average_key_length > 5.0);
    }

    #[test]
    fn empty_snapshot_has_zero_average() {
        let snapshot = IndexStats::collect(&IndexSet::new(), &StatsCollector::new(), 0, 0);
        assert_eq!(snapshot.average_key_length, 0.0);
        assert_eq!(snapshot.memory_usage, 0);
    }
}
