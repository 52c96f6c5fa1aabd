//! Error types for extraction.

use thiserror::Error;

/// Result type for extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting the raw table.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV serialization error
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Page size of zero would never advance
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Source-specific failure
    #[error("Source error: {0}")]
    Source(String),
}
