//! Query filters
//!
//! Optional, conjunctive filters for the transaction listing, plus page
//! size resolution. All inputs arrive as query-string text.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Page size used when the caller sends nothing or something non-numeric.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Conjunctive filters for the transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub month: Option<MonthFilter>,
}

/// A calendar month restriction, parsed from `MM-YYYY` or `MM-YY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthParseError {
    #[error("invalid month filter (expected MM-YYYY or MM-YY): {0}")]
    Invalid(String),
}

impl MonthFilter {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) || !(1970..=9999).contains(&year) {
            return Err(MonthParseError::Invalid(format!("{month:02}-{year}")));
        }
        Ok(Self { year, month })
    }

    /// Half-open UTC range `[first of month, first of next month)`.
    pub fn range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        // Bounds validated in `new`, both dates exist
        let start = Utc
            .with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0)
            .single()
            .expect("validated month start");
        let end = Utc
            .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
            .single()
            .expect("validated month end");

        (start, end)
    }
}

impl FromStr for MonthFilter {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthParseError::Invalid(s.to_string());

        let (month_part, year_part) = s.split_once('-').ok_or_else(invalid)?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;

        // Two-digit years normalize to 20xx
        let year: i32 = match year_part.len() {
            2 => 2000 + year_part.parse::<i32>().map_err(|_| invalid())?,
            4 => year_part.parse().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        MonthFilter::new(year, month).map_err(|_| invalid())
    }
}

/// Resolve the requested page size: absent or non-numeric input falls back
/// to the default, numeric input is clamped to `1..=MAX_PAGE_SIZE`.
pub fn resolve_page_size(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.clamp(1, MAX_PAGE_SIZE))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_filter_full_year() {
        let filter: MonthFilter = "03-2026".parse().unwrap();
        assert_eq!(filter, MonthFilter::new(2026, 3).unwrap());
    }

    #[test]
    fn test_month_filter_two_digit_year_normalizes() {
        let filter: MonthFilter = "11-24".parse().unwrap();
        assert_eq!(filter, MonthFilter::new(2024, 11).unwrap());
    }

    #[test]
    fn test_month_filter_rejects_garbage() {
        assert!("13-2026".parse::<MonthFilter>().is_err());
        assert!("00-2026".parse::<MonthFilter>().is_err());
        assert!("2026-03".parse::<MonthFilter>().is_err());
        assert!("march".parse::<MonthFilter>().is_err());
        assert!("03-026".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_month_range_is_half_open() {
        let filter: MonthFilter = "12-2025".parse().unwrap();
        let (start, end) = filter.range();
        assert_eq!(start.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_page_size_defaults() {
        assert_eq!(resolve_page_size(None), 100);
        assert_eq!(resolve_page_size(Some("abc")), 100);
        assert_eq!(resolve_page_size(Some("")), 100);
        assert_eq!(resolve_page_size(Some("25")), 25);
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(resolve_page_size(Some("0")), 1);
        assert_eq!(resolve_page_size(Some("-5")), 1);
        assert_eq!(resolve_page_size(Some("99999")), MAX_PAGE_SIZE);
    }
}
