//! Calendar month model used for payroll and settlement periods.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A calendar month, serialized as `YYYY-MM`.
///
/// Internally anchored on the first day of the month so every constructed
/// value is a valid chrono date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::YearMonth;
/// use chrono::NaiveDate;
///
/// let february: YearMonth = "2024-02".parse().unwrap();
/// assert_eq!(february.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(february.previous().to_string(), "2024-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a month, returning `None` for an out-of-range month or year.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Returns the month containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The month number, 1 through 12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The last day of the month, leap years included.
    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.0)
    }

    /// The calendar month immediately before this one.
    pub fn previous(&self) -> Self {
        self.0
            .checked_sub_months(Months::new(1))
            .map(Self)
            .unwrap_or(*self)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidYearMonth {
            value: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let month = ym("2025-03");
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2025-03");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025-3".parse::<YearMonth>().is_err());
        assert!("March 2025".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_last_day_handles_month_lengths() {
        assert_eq!(ym("2025-01").last_day(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(ym("2025-04").last_day(), NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
        assert_eq!(ym("2025-02").last_day(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(ym("2024-02").last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_last_day_century_years_and_december() {
        assert_eq!(ym("1900-02").last_day(), NaiveDate::from_ymd_opt(1900, 2, 28).unwrap());
        assert_eq!(ym("2000-02").last_day(), NaiveDate::from_ymd_opt(2000, 2, 29).unwrap());
        assert_eq!(ym("2025-12").last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_previous_wraps_year() {
        assert_eq!(ym("2025-01").previous(), ym("2024-12"));
        assert_eq!(ym("2025-07").previous(), ym("2025-06"));
    }

    #[test]
    fn test_containing_date() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 17).unwrap();
        assert_eq!(YearMonth::containing(date), ym("2025-05"));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ym("2025-11")).unwrap();
        assert_eq!(json, "\"2025-11\"");

        let parsed: YearMonth = serde_json::from_str("\"2026-02\"").unwrap();
        assert_eq!(parsed, ym("2026-02"));

        assert!(serde_json::from_str::<YearMonth>("\"2026-00\"").is_err());
    }

    #[test]
    fn test_ordering_follows_calendar() {
        assert!(ym("2024-12") < ym("2025-01"));
        assert!(ym("2025-02") > ym("2025-01"));
    }
}
