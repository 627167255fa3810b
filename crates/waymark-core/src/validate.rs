//! Story payload validation.
//!
//! Pure functions over a [`CatalogConfig`]: no I/O, deterministic, safe to
//! call repeatedly. The storage layer enforces the same rules again through
//! generated CHECK constraints; this module is the primary enforcement point.

use chrono::{Local, NaiveDate};

use crate::{
  config::CatalogConfig,
  error::{FieldError, FieldReason, ValidationErrors},
  story::{NewStory, StoryDraft},
};

/// Inclusive latitude bounds (WGS84).
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Inclusive longitude bounds (WGS84).
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Checks inbound story payloads against the configured catalog rules.
#[derive(Debug, Clone)]
pub struct Validator {
  config: CatalogConfig,
}

impl Validator {
  pub fn new(config: CatalogConfig) -> Self { Self { config } }

  pub fn config(&self) -> &CatalogConfig { &self.config }

  /// Validate and normalise a draft for creation.
  ///
  /// All applicable field errors are collected and returned together — not
  /// fail-fast — so a single round trip surfaces every problem. "Today" is
  /// the local clock at call time; a story dated today is valid.
  pub fn validate_for_create(
    &self,
    draft: StoryDraft,
  ) -> Result<NewStory, ValidationErrors> {
    let mut errors: Vec<FieldError> = Vec::new();

    let title = draft.title.trim();
    if title.is_empty() {
      errors.push(FieldError {
        field:  "title",
        reason: FieldReason::EmptyField,
      });
    } else if title.chars().count() > self.config.title_max_len {
      errors.push(FieldError {
        field:  "title",
        reason: FieldReason::TooLong { max: self.config.title_max_len },
      });
    }

    if let Some(body) = &draft.body
      && body.chars().count() > self.config.body_max_len
    {
      errors.push(FieldError {
        field:  "body",
        reason: FieldReason::TooLong { max: self.config.body_max_len },
      });
    }

    if let Some(category) = &draft.category
      && !self.config.categories.contains(category)
    {
      errors.push(FieldError {
        field:  "category",
        reason: FieldReason::NotInSet,
      });
    }

    // Coordinates are checked independently so the caller can tell which one
    // is invalid.
    if let Some(e) = check_range("latitude", draft.latitude, LATITUDE_RANGE) {
      errors.push(e);
    }
    if let Some(e) = check_range("longitude", draft.longitude, LONGITUDE_RANGE) {
      errors.push(e);
    }

    if let Some(date) = draft.occurred_on
      && date > today()
    {
      errors.push(FieldError {
        field:  "occurred_on",
        reason: FieldReason::FutureDate,
      });
    }

    if !errors.is_empty() {
      return Err(ValidationErrors(errors));
    }

    Ok(NewStory {
      title:       title.to_owned(),
      body:        draft.body,
      category:    draft.category,
      latitude:    draft.latitude,
      longitude:   draft.longitude,
      occurred_on: draft.occurred_on,
    })
  }
}

fn check_range(
  field: &'static str,
  value: f64,
  (min, max): (f64, f64),
) -> Option<FieldError> {
  // NaN fails both comparisons below, so it is rejected too.
  if value >= min && value <= max {
    None
  } else {
    Some(FieldError {
      field,
      reason: FieldReason::OutOfRange { min, max },
    })
  }
}

fn today() -> NaiveDate { Local::now().date_naive() }
