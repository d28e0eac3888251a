//! Error types for table loading.

use thiserror::Error;

/// Errors raised while reading or parsing a translation table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Delimiter/qualifier combination that cannot be parsed unambiguously
    #[error("Invalid CSV dialect: {0}")]
    InvalidDialect(String),

    /// The backing resource could not be inspected or read
    #[error("Table source unavailable: {0}")]
    SourceUnavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
