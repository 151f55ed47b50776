//! Benchmarks for Polydex.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
