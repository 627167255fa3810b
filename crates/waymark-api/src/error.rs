//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client-input failures (validation, query shape) return enough structure to
//! highlight the offending fields. Storage failures return generic messages —
//! no constraint names, no connection details — and are logged instead.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use waymark_core::{
  error::{QueryError, ValidationErrors},
  store::{FailureKind, StoreError},
};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// One or more fields of a create payload were rejected. Storage was never
  /// touched.
  #[error("{0}")]
  Validation(ValidationErrors),

  /// Malformed pagination or filter parameters. Storage was never touched.
  #[error("invalid query: {0}")]
  InvalidQuery(QueryError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// Storage rejected a write that passed validation — a configuration bug,
  /// reported to the caller without internal detail.
  #[error("story could not be saved")]
  CouldNotSave { field: Option<&'static str> },

  /// Transient storage failure; the caller may retry with backoff.
  #[error("storage temporarily unavailable")]
  Unavailable,

  #[error("internal error")]
  Internal,
}

impl ApiError {
  /// Classify a backend error and log it appropriately. Constraint violations
  /// are warning-class: they mean the validator and the schema have drifted,
  /// or validation was bypassed.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StoreError + Send + Sync + 'static,
  {
    match e.failure_kind() {
      FailureKind::Constraint { field } => {
        tracing::warn!(error = %e, "storage rejected a validated write");
        ApiError::CouldNotSave { field }
      }
      FailureKind::Unavailable => {
        tracing::warn!(error = %e, "storage unavailable");
        ApiError::Unavailable
      }
      FailureKind::Internal => {
        tracing::error!(error = %e, "storage failure");
        ApiError::Internal
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": "validation failed", "fields": errors.fields() }),
      ),
      ApiError::InvalidQuery(e) => {
        (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }))
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, json!({ "error": m }))
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::CouldNotSave { field } => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "story could not be saved", "field": field }),
      ),
      ApiError::Unavailable => (
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": "storage temporarily unavailable" }),
      ),
      ApiError::Internal => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "internal error" }),
      ),
    };
    (status, Json(body)).into_response()
  }
}
