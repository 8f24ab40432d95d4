//! Error type for `petconnect-store-sqlite`.
//!
//! The trait surface reports [`petconnect_core::Error`]; this internal type
//! collects the backend's own failure modes and collapses into
//! [`petconnect_core::Error::Store`] at the boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] petconnect_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("decimal parse error: {0}")]
  DecimalParse(String),

  /// A status or role column held a string no variant maps to.
  #[error("unrecognised column value: {0:?}")]
  UnknownVariant(String),
}

impl From<Error> for petconnect_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      other => Self::Store(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
