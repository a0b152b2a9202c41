//! Error types for `steelworks-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The requested lot code has no row in `lots` at all. Distinct from a lot
  /// that exists but has no fact rows yet, which is an empty (successful)
  /// result.
  #[error("lot not found: {0:?}")]
  LotNotFound(String),

  #[error("invalid date range: start {start} is after end {end}")]
  InvalidRange { start: NaiveDate, end: NaiveDate },

  #[error("invalid calendar date: {0:?}")]
  InvalidDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
