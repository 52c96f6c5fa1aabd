//! Missing-value imputation.
//!
//! Order is significant: bed counts first (fill, then parse with default),
//! then flags, address and update time.

use bedflow::SchemaReport;
use bedflow::schema::{BED_COUNT_COLUMNS, DUTY_ADDR, FLAG_COLUMNS, LAST_UPDATED};
use bedflow::timestamp::{parse_or_sentinel, parse_timestamp};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

const STEP: &str = "missing values";

/// Default for a missing flag.
pub const FLAG_DEFAULT: &str = "N";

/// Default for a missing address.
pub const ADDRESS_DEFAULT: &str = "Unknown";

/// Imputation outcome for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImputedColumn {
    /// Column name
    pub column: &'static str,
    /// Null values replaced with the default
    pub nulls: usize,
    /// Present values that failed to parse and were replaced with the default
    pub unparseable: usize,
}

/// Parse a bed count. NaN and infinities count as unparseable.
pub fn parse_count(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let text = column.cast(&DataType::String)?;
    Ok(text
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn impute_counts(df: &mut DataFrame, name: &'static str) -> PolarsResult<ImputedColumn> {
    let values = text_values(df.column(name)?)?;
    let nulls = values.iter().filter(|v| v.is_none()).count();

    // Pass 1: null becomes zero.
    let filled: Vec<String> = values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| "0".to_string()))
        .collect();

    // Pass 2: anything that does not parse becomes zero.
    let mut unparseable = 0;
    let counts: Vec<f64> = filled
        .iter()
        .map(|raw| {
            parse_count(raw).unwrap_or_else(|| {
                unparseable += 1;
                0.0
            })
        })
        .collect();

    df.with_column(Column::new(name.into(), counts))?;
    Ok(ImputedColumn {
        column: name,
        nulls,
        unparseable,
    })
}

fn impute_text(
    df: &mut DataFrame,
    name: &'static str,
    default: &str,
) -> PolarsResult<ImputedColumn> {
    let values = text_values(df.column(name)?)?;
    let nulls = values.iter().filter(|v| v.is_none()).count();
    let filled: Vec<String> = values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| default.to_string()))
        .collect();

    df.with_column(Column::new(name.into(), filled))?;
    Ok(ImputedColumn {
        column: name,
        nulls,
        unparseable: 0,
    })
}

fn impute_timestamps(df: &mut DataFrame, name: &'static str) -> PolarsResult<ImputedColumn> {
    let values = text_values(df.column(name)?)?;
    let nulls = values.iter().filter(|v| v.is_none()).count();

    let unparseable = values
        .iter()
        .flatten()
        .filter(|raw| parse_timestamp(raw).is_none())
        .count();

    // Unparseable and null values both land on the epoch sentinel.
    let timestamps = values.iter().map(|v| parse_or_sentinel(v.as_deref()));

    let column =
        DatetimeChunked::from_naive_datetime(name.into(), timestamps, TimeUnit::Milliseconds)
            .into_series();
    df.with_column(column)?;
    Ok(ImputedColumn {
        column: name,
        nulls,
        unparseable,
    })
}

/// Replace missing and malformed values with their column defaults.
///
/// - bed counts: null → 0, then unparseable → 0 (`Float64` afterwards)
/// - flags: null → `"N"`
/// - `duty_addr`: null → `"Unknown"`
/// - `last_updated`: unparseable → null, then null → `1970-01-01 00:00:00`
pub fn handle_missing_values(
    mut df: DataFrame,
    schema: &SchemaReport,
) -> PolarsResult<(DataFrame, Vec<ImputedColumn>)> {
    let mut imputed = Vec::new();

    for name in schema.available(STEP, &BED_COUNT_COLUMNS) {
        imputed.push(impute_counts(&mut df, name)?);
    }
    info!("bed-count nulls and unparseable values replaced with 0");

    for name in schema.available(STEP, &FLAG_COLUMNS) {
        imputed.push(impute_text(&mut df, name, FLAG_DEFAULT)?);
    }
    info!("flag nulls replaced with 'N'");

    for name in schema.available(STEP, &[DUTY_ADDR]) {
        imputed.push(impute_text(&mut df, name, ADDRESS_DEFAULT)?);
        info!("'duty_addr' nulls replaced with 'Unknown'");
    }

    for name in schema.available(STEP, &[LAST_UPDATED]) {
        imputed.push(impute_timestamps(&mut df, name)?);
        info!("'last_updated' parsed, missing values set to 1970-01-01");
    }

    Ok((df, imputed))
}
