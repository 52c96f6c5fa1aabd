//! The cleaning stage end to end.
//!
//! Sub-steps run in a fixed order: imputation, flag normalization, outlier
//! removal, type coercion. Each one skips columns the raw table lacks.

use crate::coerce::coerce_types;
use crate::error::Result;
use crate::flags::normalize_flags;
use crate::impute::{ImputedColumn, handle_missing_values};
use crate::outliers::{OutlierFilter, remove_outliers};
use crate::table::RawTable;
use bedflow::Config;
use bedflow::io::write_table;
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

/// Summary of one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreprocessReport {
    /// Rows in the raw table
    pub rows_in: usize,
    /// Rows in the cleaned table
    pub rows_out: usize,
    /// Expected columns the raw table lacked
    pub missing_columns: Vec<&'static str>,
    /// Columns outside the schema, carried through untouched
    pub unexpected_columns: Vec<String>,
    /// Imputation outcome per column
    pub imputed: Vec<ImputedColumn>,
    /// Outlier filtering outcome per column, in filtering order
    pub outliers: Vec<OutlierFilter>,
}

impl PreprocessReport {
    /// Total rows removed as outliers.
    pub fn rows_removed(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// Cleaned table with its report.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Cleaned frame
    pub frame: DataFrame,
    /// Run summary
    pub report: PreprocessReport,
}

/// Clean a raw table.
pub fn preprocess(raw: RawTable) -> Result<Preprocessed> {
    let (df, schema) = raw.into_parts();
    let rows_in = df.height();

    info!("handling missing values");
    let (df, imputed) = handle_missing_values(df, &schema)?;

    info!("normalizing flags");
    let df = normalize_flags(df, &schema)?;

    info!("removing outliers");
    let (df, outliers) = remove_outliers(df, &schema)?;

    info!("coercing types");
    let df = coerce_types(df, &schema)?;

    let report = PreprocessReport {
        rows_in,
        rows_out: df.height(),
        missing_columns: schema.missing().to_vec(),
        unexpected_columns: schema.unexpected().to_vec(),
        imputed,
        outliers,
    };
    info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        "preprocessing complete"
    );

    Ok(Preprocessed { frame: df, report })
}

/// Load the raw table named by `config`, clean it and write the result.
pub fn run(config: &Config) -> Result<PreprocessReport> {
    let raw = RawTable::load(&config.paths.input)?;
    let Preprocessed { mut frame, report } = preprocess(raw)?;
    write_table(&mut frame, &config.paths.preprocessed)?;
    Ok(report)
}
