//! Error types for the feature stage.

use bedflow::TableError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for the feature stage.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while deriving features.
///
/// The cleaned table is expected to satisfy the cleaning stage's guarantees;
/// any violation is fatal here.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Cleaned table could not be loaded or the feature table saved
    #[error(transparent)]
    Table(#[from] TableError),

    /// Required column absent
    #[error("required column '{column}' is missing")]
    MissingColumn {
        /// Column name
        column: &'static str,
    },

    /// Update time that is null or cannot be parsed
    #[error("row {row}: 'last_updated' is not a valid timestamp ({})", display_value(.value))]
    InvalidTimestamp {
        /// Zero-based row index
        row: usize,
        /// Offending value, `None` for null
        value: Option<String>,
    },

    /// Bed count that is null or not a number
    #[error("row {row}: '{column}' is not numeric ({})", display_value(.value))]
    NonNumeric {
        /// Column name
        column: &'static str,
        /// Zero-based row index
        row: usize,
        /// Offending value, `None` for null
        value: Option<String>,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

fn display_value(value: &Option<String>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = FeatureError::InvalidTimestamp {
            row: 3,
            value: Some("soon".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "row 3: 'last_updated' is not a valid timestamp (\"soon\")"
        );

        let err = FeatureError::NonNumeric {
            column: "hpbdn",
            row: 0,
            value: None,
        };
        assert_eq!(err.to_string(), "row 0: 'hpbdn' is not numeric (null)");

        let err = FeatureError::MissingColumn { column: "hvec" };
        assert_eq!(err.to_string(), "required column 'hvec' is missing");
    }
}
