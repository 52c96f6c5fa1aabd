//! Column schema of the emergency-bed tables.
//!
//! Column presence is decided once, when a table is loaded: the frame is
//! inspected against the expected schema and the resulting [`SchemaReport`]
//! tells each transform step which of its columns it can work on.

use polars::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

/// Hospital identifier.
pub const HPID: &str = "hpid";
/// Time the availability snapshot was taken.
pub const LAST_UPDATED: &str = "last_updated";
/// Emergency-room beds available.
pub const HVEC: &str = "hvec";
/// Intensive-care beds available.
pub const HVICC: &str = "hvicc";
/// Operating rooms available.
pub const HVOC: &str = "hvoc";
/// Total bed capacity.
pub const HPBDN: &str = "hpbdn";
/// CT scanner available.
pub const HVCTAYN: &str = "hvctayn";
/// MRI available.
pub const HVMRIAYN: &str = "hvmriayn";
/// Ventilator available.
pub const HVVENTISOAYN: &str = "hvventisoayn";
/// Hospital name.
pub const DUTY_NAME: &str = "duty_name";
/// Hospital address.
pub const DUTY_ADDR: &str = "duty_addr";
/// Longitude (WGS84).
pub const WGS84_LON: &str = "wgs84_lon";
/// Latitude (WGS84).
pub const WGS84_LAT: &str = "wgs84_lat";

/// Numeric bed-count columns, in outlier-filtering order.
pub const BED_COUNT_COLUMNS: [&str; 4] = [HVEC, HVICC, HVOC, HPBDN];

/// Yes/no availability flag columns.
pub const FLAG_COLUMNS: [&str; 3] = [HVCTAYN, HVMRIAYN, HVVENTISOAYN];

/// Columns forced to text after cleaning.
pub const TEXT_COLUMNS: [&str; 3] = [HPID, DUTY_NAME, DUTY_ADDR];

/// Kind of value a raw column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Free text
    Text,
    /// Point in time
    Timestamp,
    /// Non-negative bed count
    BedCount,
    /// "Y"/"N" availability flag
    Flag,
    /// WGS84 coordinate
    Coordinate,
}

impl ColumnKind {
    /// Returns a short lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::BedCount => "bed count",
            Self::Flag => "flag",
            Self::Coordinate => "coordinate",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named column together with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: &'static str,
    /// Column kind
    pub kind: ColumnKind,
}

impl ColumnSpec {
    const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// Raw-table schema. Its order is the column order of every persisted file.
pub const RAW_SCHEMA: [ColumnSpec; 13] = [
    ColumnSpec::new(HPID, ColumnKind::Text),
    ColumnSpec::new(LAST_UPDATED, ColumnKind::Timestamp),
    ColumnSpec::new(HVEC, ColumnKind::BedCount),
    ColumnSpec::new(HVICC, ColumnKind::BedCount),
    ColumnSpec::new(HVOC, ColumnKind::BedCount),
    ColumnSpec::new(HPBDN, ColumnKind::BedCount),
    ColumnSpec::new(HVCTAYN, ColumnKind::Flag),
    ColumnSpec::new(HVMRIAYN, ColumnKind::Flag),
    ColumnSpec::new(HVVENTISOAYN, ColumnKind::Flag),
    ColumnSpec::new(DUTY_NAME, ColumnKind::Text),
    ColumnSpec::new(DUTY_ADDR, ColumnKind::Text),
    ColumnSpec::new(WGS84_LON, ColumnKind::Coordinate),
    ColumnSpec::new(WGS84_LAT, ColumnKind::Coordinate),
];

/// Raw column names in schema order.
pub fn raw_column_names() -> Vec<&'static str> {
    RAW_SCHEMA.iter().map(|spec| spec.name).collect()
}

/// Raw columns of `kind`, in schema order.
pub fn raw_columns_of(kind: ColumnKind) -> Vec<&'static str> {
    RAW_SCHEMA
        .iter()
        .filter(|spec| spec.kind == kind)
        .map(|spec| spec.name)
        .collect()
}

/// Outcome of checking a loaded frame against an expected schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    missing: Vec<&'static str>,
    unexpected: Vec<String>,
}

impl SchemaReport {
    /// Inspect `df` against `schema`. Every missing column is logged as a
    /// warning and columns outside the schema are logged once.
    pub fn inspect(df: &DataFrame, schema: &[ColumnSpec]) -> Self {
        let present: BTreeSet<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        let expected: BTreeSet<&str> = schema.iter().map(|spec| spec.name).collect();

        let mut missing = Vec::new();
        for spec in schema.iter().filter(|spec| !present.contains(spec.name)) {
            warn!(column = spec.name, kind = %spec.kind, "expected column is missing");
            missing.push(spec.name);
        }
        let unexpected: Vec<String> = present
            .iter()
            .filter(|name| !expected.contains(*name))
            .map(|name| (*name).to_string())
            .collect();

        if !unexpected.is_empty() {
            info!(?unexpected, "table has columns outside the schema");
        }

        Self {
            missing,
            unexpected,
        }
    }

    /// Expected columns absent from the table.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// Columns present in the table but not in the schema.
    pub fn unexpected(&self) -> &[String] {
        &self.unexpected
    }

    /// Whether `column` is present.
    pub fn has(&self, column: &str) -> bool {
        !self.missing.iter().any(|missing| *missing == column)
    }

    /// Narrow `columns` to those present, warning once per column dropped for `step`.
    pub fn available(&self, step: &str, columns: &[&'static str]) -> Vec<&'static str> {
        columns
            .iter()
            .copied()
            .filter(|column| {
                let present = self.has(column);
                if !present {
                    warn!(step, column, "column is missing, skipping");
                }
                present
            })
            .collect()
    }
}
