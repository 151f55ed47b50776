//! # Polydex Testkit
//!
//! Test utilities for Polydex.
//!
//! This crate provides:
//! - Record fixtures and index helpers
//! - Property-based test generators using proptest
//! - A brute-force scan oracle that search results can be checked against
//! - An integration harness that mirrors change batches onto a shadow store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polydex_testkit::prelude::*;
//!
//! #[test]
//! fn finds_alice() {
//!     let index = built_index(name_records(&["Alice", "Bob"]), &["name"]);
//!     // ... search and assert
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod oracle;
mod properties;
mod scenarios;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::oracle::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::IntegrationHarness;
pub use oracle::*;
