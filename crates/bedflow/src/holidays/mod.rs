//! Public-holiday reference data.
//!
//! Holidays are looked up, never computed: lunar holidays, substitute days
//! and election days come from an embedded reference table.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeSet;

const KR_HOLIDAYS: &str = include_str!("kr_holidays.csv");

/// Calendar answering whether a date is a public holiday.
pub trait HolidayCalendar {
    /// Whether `date` is a public holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Whether the calendar holds reference data for `year`.
    fn covers(&self, year: i32) -> bool;
}

#[derive(Debug, Deserialize)]
struct HolidayRecord {
    date: NaiveDate,
}

/// South Korean public holidays.
#[derive(Debug, Clone)]
pub struct KoreanHolidays {
    dates: BTreeSet<NaiveDate>,
    years: BTreeSet<i32>,
}

impl KoreanHolidays {
    /// Load the embedded reference table.
    pub fn new() -> Result<Self, csv::Error> {
        Self::from_csv(KR_HOLIDAYS)
    }

    /// Load a `date,name` table. Only the date is kept; repeated dates collapse.
    pub fn from_csv(data: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let dates = reader
            .deserialize::<HolidayRecord>()
            .map(|record| record.map(|HolidayRecord { date }| date))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let years = dates.iter().map(|date| date.year()).collect();
        Ok(Self { dates, years })
    }
}

impl HolidayCalendar for KoreanHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    fn covers(&self, year: i32) -> bool {
        self.years.contains(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 1, 1))]
    #[case(date(2024, 2, 10))]
    #[case(date(2024, 2, 12))]
    #[case(date(2024, 9, 17))]
    #[case(date(2025, 10, 6))]
    #[case(date(2023, 5, 27))]
    #[case(date(2022, 3, 9))]
    fn test_known_holidays(#[case] day: NaiveDate) {
        let calendar = KoreanHolidays::new().unwrap();
        assert!(calendar.is_holiday(day), "{day} should be a holiday");
    }

    #[rstest]
    #[case(date(2024, 2, 14))]
    #[case(date(2024, 7, 1))]
    #[case(date(2025, 12, 24))]
    fn test_ordinary_days(#[case] day: NaiveDate) {
        let calendar = KoreanHolidays::new().unwrap();
        assert!(!calendar.is_holiday(day));
    }

    #[test]
    fn test_coverage() {
        let calendar = KoreanHolidays::new().unwrap();
        assert!(calendar.covers(2019));
        assert!(calendar.covers(2026));
        assert!(!calendar.covers(2027));
        assert!(!calendar.covers(1970));
        assert!(!calendar.is_holiday(date(1970, 1, 1)));
    }

    #[test]
    fn test_fixed_holidays_every_year() {
        let calendar = KoreanHolidays::new().unwrap();
        for year in 2019..=2026 {
            for (m, d) in [(1, 1), (3, 1), (5, 5), (6, 6), (8, 15), (10, 3), (10, 9), (12, 25)] {
                assert!(calendar.is_holiday(date(year, m, d)), "{year}-{m}-{d}");
            }
        }
    }

    #[test]
    fn test_shared_dates_collapse() {
        let calendar = KoreanHolidays::from_csv(
            "date,name\n2025-05-05,Children's Day\n2025-05-05,Buddha's Birthday\n",
        )
        .unwrap();
        assert!(calendar.is_holiday(date(2025, 5, 5)));
        assert!(!calendar.is_holiday(date(2025, 5, 6)));
        assert!(calendar.covers(2025));
        assert!(!calendar.covers(2024));
    }

    #[test]
    fn test_from_csv_rejects_bad_dates() {
        assert!(KoreanHolidays::from_csv("date,name\nnot-a-date,Nothing\n").is_err());
    }
}
