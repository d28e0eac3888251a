//! Error types for localization operations

use loctable_config::ConfigError;
use loctable_table::TableError;
use thiserror::Error;

/// Errors that can occur while changing localizer state.
///
/// Lookups never fail; they log and return an empty string instead.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// Language name was empty or whitespace
    #[error("Language name cannot be empty")]
    EmptyLanguageName,

    /// Neither a fixed language nor a header cell matched
    #[error("Language '{0}' not found in CSV headers")]
    LanguageNotFound(String),

    /// Key was empty or whitespace
    #[error("Key cannot be empty")]
    EmptyKey,

    /// No row has the key in column 0
    #[error("Key '{0}' not found in the first column")]
    KeyNotFound(String),

    /// Persisted language selection could not be read or written
    #[error("Selection store error: {0}")]
    Store(String),

    /// Table source problem
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
