//! Calendar features derived from the update time.

use crate::error::{FeatureError, Result};
use bedflow::HolidayCalendar;
use bedflow::schema::LAST_UPDATED;
use bedflow::timestamp::parse_timestamp;
use chrono::{Datelike, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

/// Day of week, 0 (Monday) to 6 (Sunday).
pub const DAY_OF_WEEK: &str = "day_of_week";
/// Hour of day, 0 to 23.
pub const HOUR: &str = "hour";
/// Coarse period of the day.
pub const TIME_OF_DAY: &str = "time_of_day";
/// 1 on Saturday and Sunday, else 0.
pub const IS_WEEKEND: &str = "is_weekend";
/// 1 on a public holiday, else 0.
pub const IS_HOLIDAY: &str = "is_holiday";

/// Coarse period of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 to 23:59
    Evening,
    /// 06:00 to 11:59
    Morning,
    /// 00:00 to 05:59
    Night,
}

impl TimeOfDay {
    /// Every period, ordered by name.
    pub const ALL: [Self; 4] = [Self::Afternoon, Self::Evening, Self::Morning, Self::Night];

    /// Periods ordered by start hour, latest first.
    const BY_START_DESC: [Self; 4] = [Self::Evening, Self::Afternoon, Self::Morning, Self::Night];

    /// First hour of the period. Each period runs up to the next one's start.
    pub const fn start_hour(&self) -> u32 {
        match self {
            Self::Night => 0,
            Self::Morning => 6,
            Self::Afternoon => 12,
            Self::Evening => 18,
        }
    }

    /// Period containing `hour`. Hours past 23 are treated as evening.
    pub fn from_hour(hour: u32) -> Self {
        Self::BY_START_DESC
            .into_iter()
            .find(|period| hour >= period.start_hour())
            .unwrap_or(Self::Night)
    }

    /// Returns the lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Morning => "morning",
            Self::Night => "night",
        }
    }

    /// Parse a lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|period| period.name() == name)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Period of the day containing `hour`.
pub fn classify_time_of_day(hour: u32) -> TimeOfDay {
    TimeOfDay::from_hour(hour)
}

/// `time_of_day` label for an hour-of-day expression.
fn time_of_day_expr(hour: Expr) -> Expr {
    let [evening, afternoon, morning, night] = TimeOfDay::BY_START_DESC;
    let starts = |period: TimeOfDay| hour.clone().gt_eq(lit(period.start_hour() as i32));
    when(starts(evening))
        .then(lit(evening.name()))
        .when(starts(afternoon))
        .then(lit(afternoon.name()))
        .when(starts(morning))
        .then(lit(morning.name()))
        .otherwise(lit(night.name()))
}

fn count_ones(df: &DataFrame, name: &str) -> PolarsResult<usize> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .i32()?
        .into_iter()
        .filter(|flag| *flag == Some(1))
        .count())
}

/// Counts gathered while deriving the calendar features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeFeatures {
    /// Rows falling on a weekend
    pub weekend_rows: usize,
    /// Rows falling on a public holiday
    pub holiday_rows: usize,
    /// Years present in the data that the holiday calendar does not cover
    pub uncovered_years: Vec<i32>,
}

/// Parse every update time. Null or unparseable values are errors.
pub fn parse_update_times(df: &DataFrame) -> Result<Vec<NaiveDateTime>> {
    let column = df
        .column(LAST_UPDATED)
        .map_err(|_| FeatureError::MissingColumn {
            column: LAST_UPDATED,
        })?
        .cast(&DataType::String)?;

    column
        .as_materialized_series()
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .and_then(parse_timestamp)
                .ok_or_else(|| FeatureError::InvalidTimestamp {
                    row,
                    value: value.map(str::to_string),
                })
        })
        .collect()
}

/// Append `day_of_week`, `hour`, `time_of_day`, `is_weekend` and `is_holiday`.
///
/// `last_updated` is rewritten as a datetime column. Dates in years the
/// calendar does not cover count as non-holidays; those years are logged once.
pub fn add_time_features<C>(mut df: DataFrame, calendar: &C) -> Result<(DataFrame, TimeFeatures)>
where
    C: HolidayCalendar + ?Sized,
{
    let timestamps = parse_update_times(&df)?;

    // Holidays come from a reference table, so this one needs a pass over the rows.
    let mut uncovered = BTreeSet::new();
    let holidays: Vec<i32> = timestamps
        .iter()
        .map(|ts| {
            let date = ts.date();
            if !calendar.covers(date.year()) {
                uncovered.insert(date.year());
            }
            i32::from(calendar.is_holiday(date))
        })
        .collect();

    let updated = DatetimeChunked::from_naive_datetime(
        LAST_UPDATED.into(),
        timestamps,
        TimeUnit::Milliseconds,
    )
    .into_series();
    df.with_column(updated)?;

    let updated = col(LAST_UPDATED);
    let mut df = df
        .lazy()
        .with_columns([
            (updated.clone().dt().weekday().cast(DataType::Int32) - lit(1)).alias(DAY_OF_WEEK),
            updated.dt().hour().cast(DataType::Int32).alias(HOUR),
        ])
        .with_columns([
            time_of_day_expr(col(HOUR)).alias(TIME_OF_DAY),
            when(col(DAY_OF_WEEK).gt_eq(lit(5)))
                .then(lit(1))
                .otherwise(lit(0))
                .cast(DataType::Int32)
                .alias(IS_WEEKEND),
        ])
        .collect()?;
    df.with_column(Column::new(IS_HOLIDAY.into(), holidays))?;

    let features = TimeFeatures {
        weekend_rows: count_ones(&df, IS_WEEKEND)?,
        holiday_rows: count_ones(&df, IS_HOLIDAY)?,
        uncovered_years: uncovered.into_iter().collect(),
    };
    if !features.uncovered_years.is_empty() {
        warn!(
            years = ?features.uncovered_years,
            "holiday calendar does not cover these years, treating their dates as non-holidays"
        );
    }

    info!(
        weekend_rows = features.weekend_rows,
        holiday_rows = features.holiday_rows,
        "time features added"
    );
    Ok((df, features))
}
