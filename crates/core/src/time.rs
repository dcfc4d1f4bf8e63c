//! Calendar date ranges for temporal filtering

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// An inclusive pair of calendar dates selecting imagery for one window.
///
/// Construction enforces `start <= end`, so a held `DateRange` is always
/// well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse from `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Catalog interval notation, e.g. `"2022-01-01/2022-01-15"`
    pub fn interval(&self) -> String {
        format!("{}/{}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_range_accepted() {
        let r = DateRange::parse("2022-01-01", "2022-01-15").unwrap();
        assert_eq!(r.interval(), "2022-01-01/2022-01-15");
    }

    #[test]
    fn single_day_range_accepted() {
        assert!(DateRange::parse("2022-06-01", "2022-06-01").is_ok());
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DateRange::parse("2022-02-01", "2022-01-01").unwrap_err();
        assert!(matches!(err, Error::InvertedDateRange { .. }));
    }

    #[test]
    fn garbage_date_rejected() {
        assert!(matches!(
            DateRange::parse("01/01/2022", "2022-01-15"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn ranges_compare_by_value() {
        let a = DateRange::parse("2022-01-01", "2022-01-15").unwrap();
        let b = DateRange::parse("2022-01-01", "2022-01-15").unwrap();
        assert_eq!(a, b);
    }
}
