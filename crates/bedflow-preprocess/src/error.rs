//! Error types for the cleaning stage.

use bedflow::TableError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for the cleaning stage.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Errors that can occur while cleaning the raw table.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Raw table could not be loaded or the cleaned table saved
    #[error(transparent)]
    Table(#[from] TableError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
