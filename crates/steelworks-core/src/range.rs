//! Validated date-range and bucket-granularity inputs.
//!
//! Every report query takes a [`DateRange`], which can only be constructed
//! with `start <= end`. Validation therefore happens before any SQL is
//! issued; a malformed filter never reaches the store.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── DateRange ───────────────────────────────────────────────────────────────

/// An inclusive calendar-date range. Both bounds are part of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
  start: NaiveDate,
  end:   NaiveDate,
}

impl DateRange {
  /// Build a range, failing with [`Error::InvalidRange`] when `start > end`.
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidRange { start, end });
    }
    Ok(Self { start, end })
  }

  /// Parse two ISO calendar dates (`YYYY-MM-DD`) and build a range.
  ///
  /// A malformed date fails with [`Error::InvalidDate`]; an inverted pair
  /// fails with [`Error::InvalidRange`].
  pub fn parse(start: &str, end: &str) -> Result<Self> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    Self::new(start, end)
  }

  pub fn start(&self) -> NaiveDate { self.start }

  pub fn end(&self) -> NaiveDate { self.end }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

// ─── Bucket ──────────────────────────────────────────────────────────────────

/// Granularity for time-bucketed trend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
  Day,
  Week,
}

impl Bucket {
  /// Truncate `date` to its bucket boundary: the date itself for daily
  /// buckets, the Monday of the ISO week for weekly buckets.
  pub fn truncate(self, date: NaiveDate) -> NaiveDate {
    match self {
      Bucket::Day => date,
      Bucket::Week => {
        let back = u64::from(date.weekday().num_days_from_monday());
        date - Days::new(back)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  #[test]
  fn range_rejects_inverted_bounds() {
    let err = DateRange::new(d("2024-02-01"), d("2024-01-01")).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
  }

  #[test]
  fn range_accepts_single_day() {
    let range = DateRange::new(d("2024-01-15"), d("2024-01-15")).unwrap();
    assert!(range.contains(d("2024-01-15")));
    assert!(!range.contains(d("2024-01-16")));
  }

  #[test]
  fn parse_rejects_malformed_date() {
    let err = DateRange::parse("2024-13-40", "2024-01-31").unwrap_err();
    assert!(matches!(err, Error::InvalidDate(_)));
  }

  #[test]
  fn week_truncates_to_monday() {
    // 2024-01-04 is a Thursday; its ISO week starts 2024-01-01.
    assert_eq!(Bucket::Week.truncate(d("2024-01-04")), d("2024-01-01"));
    // A Monday is its own bucket start.
    assert_eq!(Bucket::Week.truncate(d("2024-01-01")), d("2024-01-01"));
    // A Sunday belongs to the week that started six days earlier.
    assert_eq!(Bucket::Week.truncate(d("2024-01-07")), d("2024-01-01"));
  }

  #[test]
  fn day_truncation_is_identity() {
    assert_eq!(Bucket::Day.truncate(d("2024-01-04")), d("2024-01-04"));
  }
}
