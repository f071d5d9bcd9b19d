//! Error type for `bpm-store-sqlite`.

use bpm_core::store::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("decode error: {0}")]
  Decode(String),

  /// An update targeted an id with no row.
  #[error("no row in {table} with id {id}")]
  RowNotFound { table: &'static str, id: i64 },
}

impl GatewayError for Error {
  /// UNIQUE indexes and the contract overlap trigger both fail with
  /// `SQLITE_CONSTRAINT`.
  fn is_conflict(&self) -> bool {
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _)
      )) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
