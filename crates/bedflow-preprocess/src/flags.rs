//! Yes/no flag normalization.

use bedflow::SchemaReport;
use bedflow::schema::FLAG_COLUMNS;
use polars::prelude::*;
use tracing::info;

const STEP: &str = "flag normalization";

/// Legacy "not available" code some hospitals still report.
const LEGACY_NO: &str = "N1";

/// Map every flag to exactly `"Y"` or `"N"`.
///
/// `"N1"` becomes `"N"` first; every remaining value other than `"Y"`,
/// null included, then becomes `"N"`.
pub fn normalize_flags(df: DataFrame, schema: &SchemaReport) -> PolarsResult<DataFrame> {
    let columns = schema.available(STEP, &FLAG_COLUMNS);
    if columns.is_empty() {
        return Ok(df);
    }

    let legacy: Vec<Expr> = columns
        .iter()
        .map(|name| {
            let value = col(*name).cast(DataType::String);
            when(value.clone().eq(lit(LEGACY_NO)))
                .then(lit("N"))
                .otherwise(value)
                .alias(*name)
        })
        .collect();

    let strict: Vec<Expr> = columns
        .iter()
        .map(|name| {
            when(col(*name).eq(lit("Y")))
                .then(lit("Y"))
                .otherwise(lit("N"))
                .alias(*name)
        })
        .collect();

    let df = df.lazy().with_columns(legacy).with_columns(strict).collect()?;
    info!(columns = ?columns, "flags normalized to Y/N");
    Ok(df)
}
