//! Error type for `threads-store-sqlite`.

use rusqlite::ffi;
use thiserror::Error;
use threads_core::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A reply named a parent thread that does not exist.
  #[error("parent thread not found: {0}")]
  ParentNotFound(uuid::Uuid),
}

impl StoreError for Error {
  fn is_unique_violation(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => matches!(
        e.extended_code,
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
      ),
      _ => false,
    }
  }

  fn is_missing_parent(&self) -> bool { matches!(self, Error::ParentNotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
