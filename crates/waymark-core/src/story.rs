//! Story — the persisted, location-tagged narrative entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted story as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
  pub id:          Uuid,
  /// Absent means anonymous — a first-class state, not an error.
  pub owner_id:    Option<Uuid>,
  pub title:       String,
  pub body:        Option<String>,
  pub category:    Option<String>,
  pub latitude:    f64,
  pub longitude:   f64,
  /// The calendar date the story happened, if the author gave one.
  pub occurred_on: Option<NaiveDate>,
  /// Store-assigned; never accepted from callers.
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// An untrusted inbound payload, exactly as submitted by a caller.
///
/// Passes through [`Validator::validate_for_create`](crate::validate::Validator::validate_for_create)
/// before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryDraft {
  pub title:       String,
  pub body:        Option<String>,
  pub category:    Option<String>,
  pub latitude:    f64,
  pub longitude:   f64,
  pub occurred_on: Option<NaiveDate>,
}

/// A normalised, rule-checked story ready for the write path.
///
/// Produced by the validator; the title is trimmed and every field satisfies
/// the catalog rules at the moment of validation. `id` and timestamps are
/// assigned by the store, not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewStory {
  pub title:       String,
  pub body:        Option<String>,
  pub category:    Option<String>,
  pub latitude:    f64,
  pub longitude:   f64,
  pub occurred_on: Option<NaiveDate>,
}
