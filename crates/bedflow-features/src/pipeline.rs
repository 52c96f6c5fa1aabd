//! The feature stage end to end.

use crate::encoding::{CategoryDomain, encode_categoricals};
use crate::error::Result;
use crate::time::add_time_features;
use crate::utilization::{add_utilization, require_bed_counts};
use bedflow::io::{read_table, write_table};
use bedflow::schema::RAW_SCHEMA;
use bedflow::{Config, HolidayCalendar, SchemaReport};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

/// Summary of one feature run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureReport {
    /// Rows in the feature table
    pub rows: usize,
    /// Indicator columns appended by the one-hot encoding
    pub encoded_columns: Vec<String>,
    /// Rows falling on a weekend
    pub weekend_rows: usize,
    /// Rows falling on a public holiday
    pub holiday_rows: usize,
    /// Rows whose utilization is infinite or NaN
    pub non_finite_utilization: usize,
    /// Years the holiday calendar had no data for
    pub uncovered_years: Vec<i32>,
}

/// Feature table with its report.
#[derive(Debug, Clone)]
pub struct Engineered {
    /// Feature frame
    pub frame: DataFrame,
    /// Run summary
    pub report: FeatureReport,
}

/// Derive time features, encode categories and compute utilization.
pub fn engineer<C>(df: DataFrame, calendar: &C, domain: CategoryDomain) -> Result<Engineered>
where
    C: HolidayCalendar + ?Sized,
{
    let df = require_bed_counts(df)?;

    info!("adding time features");
    let (df, time) = add_time_features(df, calendar)?;

    info!("encoding categorical columns");
    let (df, encoded_columns) = encode_categoricals(df, domain)?;

    info!("computing bed utilization");
    let (df, non_finite_utilization) = add_utilization(df)?;

    let report = FeatureReport {
        rows: df.height(),
        encoded_columns,
        weekend_rows: time.weekend_rows,
        holiday_rows: time.holiday_rows,
        non_finite_utilization,
        uncovered_years: time.uncovered_years,
    };
    info!(
        rows = report.rows,
        columns = df.width(),
        "feature engineering complete"
    );

    Ok(Engineered { frame: df, report })
}

/// Load the cleaned table named by `config`, derive features and write the result.
pub fn run<C>(config: &Config, calendar: &C, domain: CategoryDomain) -> Result<FeatureReport>
where
    C: HolidayCalendar + ?Sized,
{
    let df = read_table(&config.paths.preprocessed)?;
    // Warns about absent columns; the required ones fail in `engineer`.
    SchemaReport::inspect(&df, &RAW_SCHEMA);

    let Engineered { mut frame, report } = engineer(df, calendar, domain)?;
    write_table(&mut frame, &config.paths.features)?;
    Ok(report)
}
