//! Calendar-month keys (`YYYY-MM`).
//!
//! All month arithmetic (boundaries, day counts, year rollover) lives here so
//! the aggregator and both reports share one definition of "a month".

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key from a year and a 1-based month.
    ///
    /// Returns [`TrackerError::InvalidMonthKey`] when `month` is outside 1..=12
    /// or the year is beyond what `chrono` can represent.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(TrackerError::InvalidMonthKey(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month a calendar date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The immediately preceding month; January rolls back to December of the
    /// previous year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The immediately following month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First day of the month.
    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    pub fn end(&self) -> NaiveDate {
        self.next()
            .start()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month (28 to 31).
    pub fn days_in_month(&self) -> u32 {
        self.end().day()
    }

    /// Whether `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }

    /// Long display label, e.g. `"October 2023"`.
    pub fn label(&self) -> String {
        self.start().format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = TrackerError;

    /// Parse a strict `YYYY-MM` key.
    fn from_str(value: &str) -> Result<Self> {
        let re = Regex::new(r"^(\d{4})-(\d{2})$").expect("regex is valid");
        let caps = re
            .captures(value.trim())
            .ok_or_else(|| TrackerError::InvalidMonthKey(value.to_string()))?;

        let year: i32 = caps[1]
            .parse()
            .map_err(|_| TrackerError::InvalidMonthKey(value.to_string()))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| TrackerError::InvalidMonthKey(value.to_string()))?;

        Self::new(year, month).map_err(|_| TrackerError::InvalidMonthKey(value.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── parsing ──────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_valid() {
        let k = key("2023-10");
        assert_eq!(k.year(), 2023);
        assert_eq!(k.month(), 10);
        assert_eq!(k.to_string(), "2023-10");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["2023-13", "2023-00", "2023-1", "23-10", "2023/10", "", "2023-10-01"] {
            let err = bad.parse::<MonthKey>().unwrap_err();
            assert!(
                matches!(err, TrackerError::InvalidMonthKey(_)),
                "expected InvalidMonthKey for {bad:?}"
            );
        }
    }

    #[test]
    fn test_new_rejects_month_out_of_range() {
        assert!(MonthKey::new(2024, 0).is_err());
        assert!(MonthKey::new(2024, 13).is_err());
        assert!(MonthKey::new(2024, 12).is_ok());
    }

    // ── arithmetic ───────────────────────────────────────────────────────────

    #[test]
    fn test_previous_within_year() {
        assert_eq!(key("2026-10").previous(), key("2026-09"));
    }

    #[test]
    fn test_previous_rolls_over_year() {
        assert_eq!(key("2026-01").previous(), key("2025-12"));
    }

    #[test]
    fn test_next_rolls_over_year() {
        assert_eq!(key("2025-12").next(), key("2026-01"));
    }

    #[test]
    fn test_boundaries() {
        let k = key("2023-10");
        assert_eq!(k.start(), date(2023, 10, 1));
        assert_eq!(k.end(), date(2023, 10, 31));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(key("2023-10").days_in_month(), 31);
        assert_eq!(key("2023-09").days_in_month(), 30);
        assert_eq!(key("2023-02").days_in_month(), 28);
        assert_eq!(key("2024-02").days_in_month(), 29);
        assert_eq!(key("2025-12").days_in_month(), 31);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let k = key("2024-02");
        assert!(k.contains(date(2024, 2, 1)));
        assert!(k.contains(date(2024, 2, 29)));
        assert!(!k.contains(date(2024, 1, 31)));
        assert!(!k.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_from_date() {
        assert_eq!(MonthKey::from_date(date(2023, 10, 25)), key("2023-10"));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys = vec![key("2026-01"), key("2025-12"), key("2025-02")];
        keys.sort();
        assert_eq!(keys, vec![key("2025-02"), key("2025-12"), key("2026-01")]);
    }

    // ── display ──────────────────────────────────────────────────────────────

    #[test]
    fn test_label() {
        assert_eq!(key("2023-10").label(), "October 2023");
        assert_eq!(key("2026-01").label(), "January 2026");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&key("2024-03")).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: MonthKey = serde_json::from_str("\"2024-03\"").unwrap();
        assert_eq!(back, key("2024-03"));
        assert!(serde_json::from_str::<MonthKey>("\"2024-3\"").is_err());
    }
}
