//! Interquartile-range outlier removal on the bed-count columns.

use bedflow::SchemaReport;
use bedflow::schema::BED_COUNT_COLUMNS;
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

const STEP: &str = "outlier removal";

/// Multiplier applied to the IQR to obtain the fences.
pub const IQR_FENCE: f64 = 1.5;

/// Tukey fences for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrBounds {
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Lower fence, `q1 - 1.5 * iqr`
    pub lower: f64,
    /// Upper fence, `q3 + 1.5 * iqr`
    pub upper: f64,
}

impl IqrBounds {
    /// Fences from the two quartiles.
    pub fn new(q1: f64, q3: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
        }
    }

    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether `value` lies within the fences, both ends inclusive.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Outcome of filtering one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierFilter {
    /// Column name
    pub column: &'static str,
    /// Fences computed on the rows surviving earlier columns
    pub bounds: IqrBounds,
    /// Rows removed by this column
    pub removed: usize,
}

/// Compute the fences of `name` over the current rows.
///
/// Quartiles use linear interpolation between closest ranks. Returns `None`
/// for an empty or all-null column.
pub fn iqr_bounds(df: &DataFrame, name: &str) -> PolarsResult<Option<IqrBounds>> {
    let value = col(name).cast(DataType::Float64);
    let quartiles = df
        .clone()
        .lazy()
        .select([
            value
                .clone()
                .quantile(lit(0.25), QuantileMethod::Linear)
                .alias("q1"),
            value.quantile(lit(0.75), QuantileMethod::Linear).alias("q3"),
        ])
        .collect()?;

    let quartile = |alias: &str| -> PolarsResult<Option<f64>> {
        let column = quartiles.column(alias)?.cast(&DataType::Float64)?;
        Ok(column.as_materialized_series().f64()?.get(0))
    };

    Ok(match (quartile("q1")?, quartile("q3")?) {
        (Some(q1), Some(q3)) => Some(IqrBounds::new(q1, q3)),
        _ => None,
    })
}

/// Remove rows outside the IQR fences, one bed-count column at a time.
///
/// Filtering is cumulative: the fences of each column are computed on the
/// rows that survived the previous columns.
pub fn remove_outliers(
    mut df: DataFrame,
    schema: &SchemaReport,
) -> PolarsResult<(DataFrame, Vec<OutlierFilter>)> {
    let mut filters = Vec::new();

    for name in schema.available(STEP, &BED_COUNT_COLUMNS) {
        if df.height() == 0 {
            debug!(column = name, "table is empty, nothing to filter");
            continue;
        }

        let Some(bounds) = iqr_bounds(&df, name)? else {
            debug!(column = name, "no quartiles, column left as is");
            continue;
        };

        let before = df.height();
        let value = col(name).cast(DataType::Float64);
        df = df
            .lazy()
            .filter(
                value
                    .clone()
                    .gt_eq(lit(bounds.lower))
                    .and(value.lt_eq(lit(bounds.upper))),
            )
            .collect()?;

        let removed = before - df.height();
        info!(
            column = name,
            removed,
            lower = bounds.lower,
            upper = bounds.upper,
            "outliers removed"
        );
        filters.push(OutlierFilter {
            column: name,
            bounds,
            removed,
        });
    }

    Ok((df, filters))
}
