//! # Polydex Core
//!
//! In-memory, multi-strategy search indexing.
//!
//! This crate provides:
//! - Four parallel inverted indices (exact, prefix, n-gram, phonetic)
//! - A query router that ranks matches by additive per-field scores
//! - Incremental maintenance with a weighted change counter that triggers
//!   full rebuilds
//! - Statistics and a memory-usage estimate for external cache managers
//!
//! ## Usage
//!
//! ```
//! use polydex_core::{MatchMode, SearchIndex, SearchOptions};
//! use serde_json::json;
//!
//! let mut index = SearchIndex::new();
//! index.build_index(
//!     vec![json!({"name": "Alice"}), json!({"name": "Alicia"}), json!({"name": "Bob"})],
//!     ["name"],
//! );
//!
//! let results = index
//!     .search("alic", &SearchOptions::new(MatchMode::Prefix))
//!     .unwrap();
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].score, 5.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod change;
mod config;
mod engine;
mod error;
pub mod index;
mod query;
mod record;
mod registry;
mod shared;
mod stats;

pub use change::{Change, UpdateReport, ADD_WEIGHT, DELETE_WEIGHT, UPDATE_WEIGHT};
pub use config::{IndexConfig, RemovalStrategy};
pub use engine::SearchIndex;
pub use error::{CoreError, CoreResult};
pub use index::{soundex, IndexKind};
pub use query::{
    MatchMode, SearchMetadata, SearchOptions, SearchResult, EXACT_WEIGHT, FUZZY_WEIGHT,
    PREFIX_WEIGHT,
};
pub use record::{normalize, FieldPath, Record};
pub use registry::IndexRegistry;
pub use shared::SharedSearchIndex;
pub use stats::{
    estimate_memory, IndexStats, KeysPerKind, StatsCollector, ESTIMATED_BYTES_PER_KEY,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
