//! Error types for Polydex core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Polydex core operations.
///
/// Malformed field paths and degenerate queries are not errors; they simply
/// produce no index entries or no matches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The index has not been built, or indexing is disabled.
    #[error("index not ready: {reason}")]
    IndexNotReady {
        /// Why the index cannot serve the call.
        reason: String,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },

    /// A match mode name could not be parsed.
    #[error("unknown match mode: {mode} (expected exact, prefix, partial or fuzzy)")]
    UnknownMatchMode {
        /// The name that was supplied.
        mode: String,
    },

    /// A named index already exists in the registry.
    #[error("index already exists: {name}")]
    IndexAlreadyExists {
        /// Name of the index.
        name: String,
    },

    /// A named index was not found in the registry.
    #[error("index not found: {name}")]
    IndexNotFound {
        /// Name of the index.
        name: String,
    },
}

impl CoreError {
    /// Creates an index-not-ready error.
    pub fn index_not_ready(reason: impl Into<String>) -> Self {
        Self::IndexNotReady {
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an unknown match mode error.
    pub fn unknown_match_mode(mode: impl Into<String>) -> Self {
        Self::UnknownMatchMode { mode: mode.into() }
    }

    /// Creates an index-already-exists error.
    pub fn index_already_exists(name: impl Into<String>) -> Self {
        Self::IndexAlreadyExists { name: name.into() }
    }

    /// Creates an index-not-found error.
    pub fn index_not_found(name: impl Into<String>) -> Self {
        Self::IndexNotFound { name: name.into() }
    }

    /// Returns true if this error means the caller must build the index first.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::IndexNotReady { .. })
    }
}
