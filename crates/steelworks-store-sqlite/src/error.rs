//! Error type for `steelworks-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A write violated a foreign key, CHECK, or UNIQUE constraint. The
  /// message is surfaced verbatim from SQLite.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("lot not found: {0:?}")]
  LotNotFound(String),

  #[error("production line not found: {0:?}")]
  LineNotFound(String),

  #[error("defect type not found: {0:?}")]
  DefectTypeNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
