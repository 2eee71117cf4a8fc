use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, held as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct MonthParseError(pub String);

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(month_start(date))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        month_end(self.0)
    }

    pub fn next(&self) -> Self {
        Self(shift_months(self.0, 1))
    }

    /// Half-open window `[first day, first day of next month)`.
    pub fn window(&self) -> MonthWindow {
        MonthWindow {
            start: self.first_day(),
            end: self.next().first_day(),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// `YYYY-MM`, the form used in query strings and for month comparisons.
    pub fn key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }

    /// `YYYY-MM-DD` of the first day, the form stored in the database.
    pub fn to_db_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Read a month stored as `YYYY-MM-DD` (day ignored) or `YYYY-MM`.
    pub fn from_db_string(s: &str) -> Result<Self, MonthParseError> {
        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Ok(Self::containing(date)),
            Err(_) => s.parse(),
        }
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Days remaining in the month of `today`, counting today itself.
pub fn days_left_in_month(today: NaiveDate) -> u32 {
    Month::containing(today).days_in_month() - today.day() + 1
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    shift_months(month_start(date), 1)
        .pred_opt()
        .unwrap_or(date)
}

fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total_months = date.year() * 12 + date.month() as i32 - 1 + months;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(new_year, new_month, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month() {
        let month: Month = "2024-06".parse().unwrap();
        assert_eq!(month, Month::new(2024, 6).unwrap());
        assert_eq!(month.first_day(), date(2024, 6, 1));
        assert_eq!(month.key(), "2024-06");
    }

    #[test]
    fn test_parse_month_rejects_malformed() {
        for bad in ["", "2024", "2024-6", "2024-13", "2024-00", "24-06", "2024/06", "2024-06-01", "abcd-ef"] {
            assert!(bad.parse::<Month>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let window = Month::new(2024, 3).unwrap().window();
        assert!(window.contains(date(2024, 3, 1)));
        assert!(window.contains(date(2024, 3, 31)));
        assert!(!window.contains(date(2024, 4, 1)));
        assert!(!window.contains(date(2024, 2, 29)));
    }

    #[test]
    fn test_december_window_rolls_into_next_year() {
        let window = Month::new(2024, 12).unwrap().window();
        assert_eq!(window.start, date(2024, 12, 1));
        assert_eq!(window.end, date(2025, 1, 1));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(Month::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(Month::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(Month::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn test_days_left_counts_today() {
        assert_eq!(days_left_in_month(date(2024, 6, 1)), 30);
        assert_eq!(days_left_in_month(date(2024, 6, 30)), 1);
        assert_eq!(days_left_in_month(date(2024, 12, 15)), 17);
    }

    #[test]
    fn test_db_string_round_trip() {
        let month = Month::new(2023, 1).unwrap();
        assert_eq!(month.to_db_string(), "2023-01-01");
        assert_eq!(Month::from_db_string("2023-01-01").unwrap(), month);
        assert_eq!(Month::from_db_string("2023-01-17").unwrap(), month);
        assert_eq!(Month::from_db_string("2023-01").unwrap(), month);
    }
}
