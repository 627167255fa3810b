//! Error types for `waymark-core`.
//!
//! Two client-input error families live here: [`ValidationErrors`] from the
//! write path and [`QueryError`] from the read path. Neither ever touches
//! storage; both are fully recoverable by the caller correcting input.

use serde::Serialize;
use thiserror::Error;

// ─── Field-attributed validation errors ──────────────────────────────────────

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FieldReason {
  /// Required text field is blank after trimming.
  EmptyField,
  /// Text field exceeds its length bound.
  TooLong { max: usize },
  /// Value is not a member of the configured category set.
  NotInSet,
  /// Numeric value falls outside its inclusive bounds.
  OutOfRange { min: f64, max: f64 },
  /// Calendar date is strictly after today.
  FutureDate,
}

/// One rejected field. `field` names the offending input field so callers can
/// highlight it; coordinates are attributed independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
  pub field:  &'static str,
  #[serde(flatten)]
  pub reason: FieldReason,
}

/// Every field error found in one validation pass. The validator collects all
/// applicable errors rather than failing fast, so a single round trip surfaces
/// every problem.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
  pub fn fields(&self) -> &[FieldError] { &self.0 }

  pub fn has(&self, field: &str) -> bool {
    self.0.iter().any(|e| e.field == field)
  }
}

// ─── Read-path shape errors ──────────────────────────────────────────────────

/// A malformed pagination or filter parameter, raised before any store access.
///
/// Note that an inverted date range (`date_from > date_to`) is *not* an error;
/// it legitimately yields zero rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
  #[error("limit must be positive, got {0}")]
  InvalidLimit(i64),

  #[error("offset must be non-negative, got {0}")]
  InvalidOffset(i64),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),
}
