//! One-hot encoding of the day-of-week and time-of-day categories.

use crate::error::{FeatureError, Result};
use crate::time::{DAY_OF_WEEK, TIME_OF_DAY, TimeOfDay};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Prefix of the day-of-week indicator columns.
pub const DOW_PREFIX: &str = "dow_";
/// Prefix of the time-of-day indicator columns.
pub const TOD_PREFIX: &str = "tod_";

/// Which categories get an indicator column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryDomain {
    /// Every category, so the output schema does not depend on the batch.
    #[default]
    Full,
    /// Only categories present in the batch.
    Observed,
}

/// Encode `day_of_week` as `dow_0..dow_6` and `time_of_day` as `tod_*`.
///
/// The source columns are dropped and the boolean indicator columns appended,
/// day of week first, each group sorted by category. Returns the frame and
/// the names of the appended columns. A null category sets no indicator.
pub fn encode_categoricals(
    df: DataFrame,
    domain: CategoryDomain,
) -> Result<(DataFrame, Vec<String>)> {
    let days = category_column(&df, DAY_OF_WEEK)?;
    let periods = category_column(&df, TIME_OF_DAY)?;

    let day_domain: BTreeSet<i32> = match domain {
        CategoryDomain::Full => (0..7).collect(),
        CategoryDomain::Observed => days
            .cast(&DataType::Int32)?
            .as_materialized_series()
            .unique()?
            .i32()?
            .into_iter()
            .flatten()
            .collect(),
    };
    let period_domain: BTreeSet<TimeOfDay> = match domain {
        CategoryDomain::Full => TimeOfDay::ALL.into_iter().collect(),
        CategoryDomain::Observed => periods
            .cast(&DataType::String)?
            .as_materialized_series()
            .unique()?
            .str()?
            .into_iter()
            .filter_map(|value| value.and_then(TimeOfDay::from_name))
            .collect(),
    };

    let mut encoded = Vec::with_capacity(day_domain.len() + period_domain.len());
    let mut indicators = Vec::with_capacity(encoded.capacity());
    for day in day_domain {
        let name = format!("{DOW_PREFIX}{day}");
        indicators.push(indicator(col(DAY_OF_WEEK).eq(lit(day)), &name));
        encoded.push(name);
    }
    for period in period_domain {
        let name = format!("{TOD_PREFIX}{period}");
        indicators.push(indicator(col(TIME_OF_DAY).eq(lit(period.name())), &name));
        encoded.push(name);
    }

    let df = df
        .lazy()
        .with_columns(indicators)
        .collect()?
        .drop(DAY_OF_WEEK)?
        .drop(TIME_OF_DAY)?;

    info!(columns = encoded.len(), ?domain, "categorical columns encoded");
    Ok((df, encoded))
}

/// `true` where `matches` holds. A null comparison yields `false`.
fn indicator(matches: Expr, name: &str) -> Expr {
    when(matches)
        .then(lit(true))
        .otherwise(lit(false))
        .alias(name)
}

fn category_column(df: &DataFrame, column: &'static str) -> Result<Column> {
    df.column(column)
        .cloned()
        .map_err(|_| FeatureError::MissingColumn { column })
}
