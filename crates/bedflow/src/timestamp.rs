//! Permissive timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format used when timestamps are written to a table file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    // Compact form emitted by the emergency-medical open API.
    "%Y%m%d%H%M%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Fallback timestamp for rows with no usable update time: `1970-01-01 00:00:00`.
pub fn epoch_sentinel() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Parse `raw` as a timestamp, returning `None` when no known form matches.
///
/// Offsets in RFC 3339 input are dropped and the local wall time is kept.
/// Date-only input resolves to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse `raw`, falling back to the epoch sentinel when absent or unparseable.
pub fn parse_or_sentinel(raw: Option<&str>) -> NaiveDateTime {
    raw.and_then(parse_timestamp).unwrap_or_else(epoch_sentinel)
}
