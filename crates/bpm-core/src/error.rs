//! Error types for `bpm-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{status::EntityKind, store::GatewayError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} not found: {key}")]
  NotFound { kind: EntityKind, key: String },

  /// A business key, scope duplicate or overlapping window already exists.
  #[error("{0}")]
  Conflict(String),

  #[error("invalid {kind} status: {value:?}")]
  InvalidStatus { kind: EntityKind, value: String },

  #[error("end date {end} precedes start date {start}")]
  InvalidWindow { start: NaiveDate, end: NaiveDate },

  #[error("{kind} has no effective window")]
  NoWindow { kind: EntityKind },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
    Self::NotFound { kind, key: key.to_string() }
  }

  /// Lift a gateway failure. Constraint violations raised by the storage
  /// layer become [`Error::Conflict`].
  pub fn gateway<E: GatewayError>(err: E) -> Self {
    if err.is_conflict() {
      Self::Conflict(err.to_string())
    } else {
      Self::Storage(Box::new(err))
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
