//! Index configuration.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// How updates and deletes are reflected in the live indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalStrategy {
    /// Never retract keys. Updates are indexed as additions and deletes only
    /// shift the backing store, so stale or phantom hits may be returned
    /// until the weighted change counter forces a rebuild.
    #[default]
    MarkForRebuild,
    /// Keep a forward index (position to keys) and retract keys precisely.
    /// Deletes renumber every later position in all four indices.
    Precise,
}

/// Configuration for a search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Whether indexing is enabled at all. When disabled, searches fail
    /// with `IndexNotReady`.
    pub enabled: bool,

    /// Weighted change count at which a full rebuild is triggered.
    pub rebuild_threshold: u64,

    /// Longest prefix (in characters) stored in the prefix index.
    pub max_prefix_len: usize,

    /// Gram length (in characters) for the n-gram index.
    pub ngram_size: usize,

    /// How updates and deletes are applied to the indices.
    pub removal_strategy: RemovalStrategy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rebuild_threshold: 100,
            max_prefix_len: 10,
            ngram_size: 3,
            removal_strategy: RemovalStrategy::MarkForRebuild,
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether indexing is enabled.
    #[must_use]
    pub const fn enabled(mut self, value: bool) -> Self {
        self.enabled = value;
        self
    }

    /// Sets the weighted change count that triggers a rebuild.
    ///
    /// A threshold of 1 rebuilds after every change batch.
    #[must_use]
    pub const fn rebuild_threshold(mut self, threshold: u64) -> Self {
        self.rebuild_threshold = threshold;
        self
    }

    /// Sets the longest indexed prefix.
    #[must_use]
    pub const fn max_prefix_len(mut self, len: usize) -> Self {
        self.max_prefix_len = len;
        self
    }

    /// Sets the n-gram length.
    #[must_use]
    pub const fn ngram_size(mut self, size: usize) -> Self {
        self.ngram_size = size;
        self
    }

    /// Sets the removal strategy.
    #[must_use]
    pub const fn removal_strategy(mut self, strategy: RemovalStrategy) -> Self {
        self.removal_strategy = strategy;
        self
    }

    /// Shorthand for `removal_strategy(RemovalStrategy::Precise)`.
    #[must_use]
    pub const fn precise(self) -> Self {
        self.removal_strategy(RemovalStrategy::Precise)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> CoreResult<()> {
        if self.rebuild_threshold == 0 {
            return Err(CoreError::invalid_config(
                "rebuild_threshold must be at least 1",
            ));
        }
        if self.max_prefix_len == 0 {
            return Err(CoreError::invalid_config("max_prefix_len must be at least 1"));
        }
        if self.ngram_size == 0 {
            return Err(CoreError::invalid_config("ngram_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = IndexConfig::default();
        assert!(config.enabled);
        assert_eq!(config.rebuild_threshold, 100);
        assert_eq!(config.max_prefix_len, 10);
        assert_eq!(config.ngram_size, 3);
        assert_eq!(config.removal_strategy, RemovalStrategy::MarkForRebuild);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = IndexConfig::new()
            .enabled(false)
            .rebuild_threshold(1)
            .precise();

        assert!(!config.enabled);
        assert_eq!(config.rebuild_threshold, 1);
        assert_eq!(config.removal_strategy, RemovalStrategy::Precise);
    }

    #[test]
    fn validate_rejects_zero_values() {
        assert!(IndexConfig::new().rebuild_threshold(0).validate().is_err());
        assert!(IndexConfig::new().max_prefix_len(0).validate().is_err());
        assert!(IndexConfig::new().ngram_size(0).validate().is_err());
    }

    #[test]
    fn deserialize_partial_json() {
        let config: IndexConfig =
            serde_json::from_str(r#"{"rebuild_threshold": 5, "removal_strategy": "precise"}"#)
                .unwrap();
        assert_eq!(config.rebuild_threshold, 5);
        assert_eq!(config.removal_strategy, RemovalStrategy::Precise);
        assert_eq!(config.max_prefix_len, 10);
    }
}
