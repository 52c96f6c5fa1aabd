//! Final type coercion of identifier and text columns.

use bedflow::SchemaReport;
use bedflow::schema::TEXT_COLUMNS;
use polars::prelude::*;
use tracing::info;

const STEP: &str = "type coercion";

/// Cast `hpid`, `duty_name` and `duty_addr` to `String`.
pub fn coerce_types(mut df: DataFrame, schema: &SchemaReport) -> PolarsResult<DataFrame> {
    for name in schema.available(STEP, &TEXT_COLUMNS) {
        let text = df.column(name)?.cast(&DataType::String)?;
        df.with_column(text)?;
    }
    info!("text columns coerced");
    Ok(df)
}
