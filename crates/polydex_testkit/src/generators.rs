//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records and change batches.
//! Words are ASCII so that lowercasing is one-to-one per character.

use polydex_core::Change;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating a single word.
pub fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z]{1,8}").expect("Invalid regex")
}

/// Strategy for generating a word over a tiny alphabet.
///
/// Collisions between records are frequent, which exercises posting lists
/// with several positions per key.
pub fn colliding_word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abAB]{1,4}").expect("Invalid regex")
}

/// Strategy for generating a `{"name": ..., "city": ...}` record.
///
/// `city` is missing from roughly a quarter of the records.
pub fn record_strategy() -> impl Strategy<Value = Value> {
    (
        colliding_word_strategy(),
        prop::option::weighted(0.75, word_strategy()),
    )
        .prop_map(|(name, city)| match city {
            Some(city) => json!({ "name": name, "city": city }),
            None => json!({ "name": name }),
        })
}

/// Strategy for generating a record collection.
pub fn records_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(record_strategy(), min..max)
}

/// Strategy for generating a single change.
///
/// Positions are drawn from `0..max_position`, so some may be out of range
/// for the index they are applied to.
pub fn change_strategy(max_position: usize) -> impl Strategy<Value = Change<Value>> {
    let max_position = max_position.max(1);
    prop_oneof![
        3 => record_strategy().prop_map(|item| Change::Add { item }),
        2 => (0..max_position, record_strategy())
            .prop_map(|(position, item)| Change::Update { position, item }),
        1 => (0..max_position).prop_map(|position| Change::Delete { position }),
    ]
}

/// Strategy for generating a batch of changes.
pub fn change_batch_strategy(
    max_position: usize,
    min_changes: usize,
    max_changes: usize,
) -> impl Strategy<Value = Vec<Change<Value>>> {
    prop::collection::vec(change_strategy(max_position), min_changes..max_changes)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn words_are_ascii_letters(word in word_strategy()) {
            prop_assert!(!word.is_empty());
            prop_assert!(word.chars().all(|c| c.is_ascii_alphabetic()));
        }

        #[test]
        fn records_always_have_a_name(record in record_strategy()) {
            prop_assert!(record.get("name").and_then(Value::as_str).is_some());
        }

        #[test]
        fn change_positions_are_bounded(change in change_strategy(5)) {
            match change {
                Change::Add { .. } => {}
                Change::Update { position, .. } | Change::Delete { position } => {
                    prop_assert!(position < 5);
                }
            }
        }
    }
}
