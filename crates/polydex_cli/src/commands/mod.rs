//! CLI command implementations.

pub mod apply;
pub mod search;
pub mod soundex;
pub mod stats;

use polydex_core::{CoreError, IndexConfig, SearchIndex};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors raised by the CLI before reaching the engine.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An input file is not valid JSON of the expected shape.
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        /// The file that failed.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The requested output format is not supported.
    #[error("unknown output format: {0} (expected text or json)")]
    UnknownFormat(String),

    /// The engine rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Output format shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CliError::UnknownFormat(s.to_string())),
        }
    }
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the index configuration, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<IndexConfig, CliError> {
    let config = match path {
        Some(path) => read_json(path)?,
        None => IndexConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Loads a record file and builds an index over it.
pub fn build_from_file(
    records: &Path,
    fields: &[String],
    config: IndexConfig,
) -> Result<SearchIndex<Value>, CliError> {
    let records: Vec<Value> = read_json(records)?;
    let mut index = SearchIndex::with_config(config)?;
    index.build_index(records, fields);
    debug!(records = index.len(), fields = fields.len(), "index ready");
    Ok(index)
}
