//! Error types for tfvc-cache
//!
//! All modules use `CacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur in the cache components
#[derive(Error, Debug)]
pub enum CacheError {
    // Root classification errors
    #[error("Invalid path: {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    // Reconciliation errors
    #[error("Argument must not be empty: {0}")]
    EmptyArgument(&'static str),

    #[error("Invalid workspace {field}: {reason}")]
    WorkspaceInvalid { field: &'static str, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // Command-line input errors
    #[error("{0}")]
    User(String),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Only local IO failures qualify; the cache itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPath { .. } => {
                Some("Paths inside the $tf/.tf service directory cannot be cached")
            }
            Self::WorkspaceInvalid { .. } => {
                Some("A workspace needs a name and at least one mapping")
            }
            Self::ConfigInvalid { .. } => Some("Run: tfvc-cache config init --force"),
            _ => None,
        }
    }
}
