//! Bed utilization ratios against total capacity.

use crate::error::{FeatureError, Result};
use bedflow::schema::{BED_COUNT_COLUMNS, HPBDN, HVEC, HVICC};
use polars::prelude::*;
use tracing::{info, warn};

/// Available ER beds per total bed.
pub const ER_BED_UTILIZATION: &str = "er_bed_utilization";
/// Available ICU beds per total bed.
pub const ICU_BED_UTILIZATION: &str = "icu_bed_utilization";

/// Rewrite every bed-count column as `Float64`, failing on a null or
/// non-numeric value.
pub fn require_bed_counts(mut df: DataFrame) -> Result<DataFrame> {
    for column in BED_COUNT_COLUMNS {
        let text = df
            .column(column)
            .map_err(|_| FeatureError::MissingColumn { column })?
            .cast(&DataType::String)?;

        let counts = text
            .as_materialized_series()
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .and_then(|raw| raw.trim().parse::<f64>().ok())
                    .ok_or_else(|| FeatureError::NonNumeric {
                        column,
                        row,
                        value: value.map(str::to_string),
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        df.with_column(Column::new(column.into(), counts))?;
    }
    Ok(df)
}

/// Append `er_bed_utilization = hvec / hpbdn` and
/// `icu_bed_utilization = hvicc / hpbdn`.
///
/// Division follows IEEE rules: a zero `hpbdn` yields an infinite or NaN
/// ratio, which is kept. Returns the frame and the number of rows with a
/// non-finite ratio.
pub fn add_utilization(df: DataFrame) -> Result<(DataFrame, usize)> {
    let df = df
        .lazy()
        .with_columns([
            (col(HVEC).cast(DataType::Float64) / col(HPBDN).cast(DataType::Float64))
                .alias(ER_BED_UTILIZATION),
            (col(HVICC).cast(DataType::Float64) / col(HPBDN).cast(DataType::Float64))
                .alias(ICU_BED_UTILIZATION),
        ])
        .collect()?;

    let er = df.column(ER_BED_UTILIZATION)?.as_materialized_series().f64()?;
    let icu = df.column(ICU_BED_UTILIZATION)?.as_materialized_series().f64()?;
    let non_finite = er
        .into_iter()
        .zip(icu)
        .filter(|(er, icu)| !er.is_some_and(f64::is_finite) || !icu.is_some_and(f64::is_finite))
        .count();

    if non_finite > 0 {
        warn!(
            rows = non_finite,
            "zero total beds, utilization is not finite for these rows"
        );
    }
    info!("utilization ratios added");
    Ok((df, non_finite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bedflow::schema::HVOC;

    fn frame(hvec: &[f64], hvicc: &[f64], hpbdn: &[f64]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(HVEC.into(), hvec),
            Column::new(HVICC.into(), hvicc),
            Column::new(HPBDN.into(), hpbdn),
        ])
        .unwrap()
    }

    fn ratios(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_half_utilization() {
        let (out, non_finite) = add_utilization(frame(&[5.0], &[2.0], &[10.0])).unwrap();
        assert_relative_eq!(ratios(&out, ER_BED_UTILIZATION)[0], 0.5);
        assert_relative_eq!(ratios(&out, ICU_BED_UTILIZATION)[0], 0.2);
        assert_eq!(non_finite, 0);
    }

    #[test]
    fn test_zero_capacity_is_not_finite() {
        let (out, non_finite) =
            add_utilization(frame(&[5.0, 0.0, 1.0], &[0.0, 0.0, 1.0], &[0.0, 0.0, 4.0])).unwrap();

        let er = ratios(&out, ER_BED_UTILIZATION);
        assert!(er[0].is_infinite() && er[0].is_sign_positive());
        assert!(er[1].is_nan());
        assert_relative_eq!(er[2], 0.25);
        assert!(ratios(&out, ICU_BED_UTILIZATION)[0].is_nan());
        assert_eq!(non_finite, 2);
    }

    #[test]
    fn test_bed_counts_are_parsed_from_text() {
        let df = DataFrame::new(vec![
            Column::new(HVEC.into(), ["5.0", " 3 "]),
            Column::new(HVICC.into(), ["1", "0"]),
            Column::new(HVOC.into(), ["2", "2"]),
            Column::new(HPBDN.into(), ["10", "12"]),
        ])
        .unwrap();

        let out = require_bed_counts(df).unwrap();
        assert_eq!(ratios(&out, HVEC), vec![5.0, 3.0]);
        assert_eq!(out.column(HPBDN).unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_non_numeric_bed_count_is_an_error() {
        let df = DataFrame::new(vec![
            Column::new(HVEC.into(), [Some("5"), Some("many")]),
            Column::new(HVICC.into(), [Some("1"), Some("0")]),
            Column::new(HVOC.into(), [Some("2"), None]),
            Column::new(HPBDN.into(), [Some("10"), Some("12")]),
        ])
        .unwrap();

        let err = require_bed_counts(df).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::NonNumeric { column: HVEC, row: 1, .. }
        ));
    }

    #[test]
    fn test_missing_bed_count_is_an_error() {
        let df = frame(&[1.0], &[1.0], &[1.0]);
        let err = require_bed_counts(df).unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn { column: HVOC }));
    }
}
