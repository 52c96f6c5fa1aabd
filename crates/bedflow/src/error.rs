//! Error types shared by every pipeline stage.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a table file.
#[derive(Debug, Error)]
pub enum TableError {
    /// Input file does not exist
    #[error("input file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Input file exists but could not be parsed as CSV
    #[error("failed to read table {}: {source}", path.display())]
    Read {
        /// Path of the table
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: PolarsError,
    },

    /// Table could not be written
    #[error("failed to write table {}: {source}", path.display())]
    Write {
        /// Path of the table
        path: PathBuf,
        /// Underlying writer error
        #[source]
        source: PolarsError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building the process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("required setting '{name}' is not set")]
    Missing {
        /// Name of the setting
        name: &'static str,
    },

    /// A setting is present but cannot be coerced to its type
    #[error("setting '{name}' must be {expected}, got '{value}'")]
    InvalidType {
        /// Name of the setting
        name: &'static str,
        /// Human-readable name of the expected type
        expected: &'static str,
        /// Raw value that failed to parse
        value: String,
    },
}
