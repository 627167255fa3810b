//! Error type for `waymark-store-sqlite` and SQLite failure classification.
//!
//! A rejected write whose SQLite error code is `SQLITE_CONSTRAINT` becomes
//! [`Error::Constraint`] with the offending field recovered from the
//! constraint name in the message (the names are fixed in [`crate::schema`]).
//! Busy/locked/IO conditions become [`Error::Unavailable`] so callers can
//! retry with backoff; the store itself never retries.

use thiserror::Error;
use waymark_core::store::{FailureKind, StoreError};

#[derive(Debug, Error)]
pub enum Error {
  /// The database rejected a write through one of its CHECK constraints.
  /// Validation should have caught this first; reaching here means the
  /// validator was bypassed or its rules drifted from the schema.
  #[error("constraint violation: {message}")]
  Constraint {
    field:   Option<&'static str>,
    message: String,
  },

  /// Transient: the database could not be reached or is locked.
  #[error("database unavailable: {0}")]
  Unavailable(String),

  #[error("database error: {0}")]
  Database(String),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("column decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Error::Constraint { field, .. } => {
        FailureKind::Constraint { field: *field }
      }
      Error::Unavailable(_) => FailureKind::Unavailable,
      _ => FailureKind::Internal,
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(re) => classify(re),
      tokio_rusqlite::Error::ConnectionClosed => {
        Error::Unavailable("connection closed".to_owned())
      }
      other => Error::Database(other.to_string()),
    }
  }
}

fn classify(e: rusqlite::Error) -> Error {
  use rusqlite::ErrorCode;

  match &e {
    rusqlite::Error::SqliteFailure(ffi, message) => match ffi.code {
      ErrorCode::ConstraintViolation => {
        let message =
          message.clone().unwrap_or_else(|| "constraint failed".to_owned());
        Error::Constraint { field: field_for_constraint(&message), message }
      }
      ErrorCode::DatabaseBusy
      | ErrorCode::DatabaseLocked
      | ErrorCode::CannotOpen
      | ErrorCode::SystemIoFailure => Error::Unavailable(e.to_string()),
      _ => Error::Database(e.to_string()),
    },
    _ => Error::Database(e.to_string()),
  }
}

/// Best-guess field attribution from the constraint name embedded in the
/// SQLite error message. Must track the names in [`crate::schema::schema_sql`].
fn field_for_constraint(message: &str) -> Option<&'static str> {
  const NAMES: &[(&str, &str)] = &[
    ("stories_title_check", "title"),
    ("stories_body_check", "body"),
    ("stories_category_check", "category"),
    ("stories_latitude_check", "latitude"),
    ("stories_longitude_check", "longitude"),
  ];

  NAMES
    .iter()
    .find(|(name, _)| message.contains(name))
    .map(|(_, field)| *field)
}
