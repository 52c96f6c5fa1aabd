//! The raw table as loaded from disk.

use crate::error::Result;
use bedflow::io::read_table;
use bedflow::schema::{RAW_SCHEMA, raw_columns_of};
use bedflow::{ColumnKind, SchemaReport};
use polars::prelude::*;
use std::path::Path;

/// Raw frame together with the outcome of its schema check.
#[derive(Debug, Clone)]
pub struct RawTable {
    frame: DataFrame,
    schema: SchemaReport,
}

impl RawTable {
    /// Load the raw table from `path`. Fails fast on a missing or malformed file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_frame(read_table(path)?)
    }

    /// Validate `frame` against the raw schema and normalize coordinate columns
    /// to `Float64` (unparseable values become null).
    pub fn from_frame(mut frame: DataFrame) -> Result<Self> {
        let schema = SchemaReport::inspect(&frame, &RAW_SCHEMA);

        for name in raw_columns_of(ColumnKind::Coordinate) {
            if schema.has(name) {
                let coordinates = frame.column(name)?.cast(&DataType::Float64)?;
                frame.with_column(coordinates)?;
            }
        }

        Ok(Self { frame, schema })
    }

    /// The raw frame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Schema check outcome.
    pub const fn schema(&self) -> &SchemaReport {
        &self.schema
    }

    /// Split into frame and schema report.
    pub fn into_parts(self) -> (DataFrame, SchemaReport) {
        (self.frame, self.schema)
    }
}
