//! Handlers for `/api/stories` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/stories` | Body: [`StoryDraft`]; optional `X-Owner-Id` header |
//! | `GET`  | `/api/stories` | Filter/pagination query params, see [`ListParams`] |
//! | `GET`  | `/api/stories/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use waymark_core::{
  query::{ListRequest, SortOrder, StoryFilter, StoryPage},
  store::StoryStore,
  story::{Story, StoryDraft},
};

use crate::{AppState, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /api/stories` — validates the draft, then persists it.
///
/// Ownership comes from the optional `X-Owner-Id` header (the identity source
/// is external); a missing header means an anonymous story.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(draft): Json<StoryDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StoryStore,
{
  let owner_id = owner_from_headers(&headers)?;

  // Reject early and cheaply; the store is never touched on invalid input.
  let story = state
    .validator
    .validate_for_create(draft)
    .map_err(ApiError::Validation)?;

  let story = state
    .store
    .create(story, owner_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(story)))
}

fn owner_from_headers(headers: &HeaderMap) -> Result<Option<Uuid>, ApiError> {
  let Some(value) = headers.get("x-owner-id") else {
    return Ok(None);
  };
  let value = value.to_str().map_err(|_| {
    ApiError::BadRequest("X-Owner-Id header is not valid text".to_owned())
  })?;
  let id = Uuid::parse_str(value).map_err(|_| {
    ApiError::BadRequest("X-Owner-Id must be a valid UUID".to_owned())
  })?;
  Ok(Some(id))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Requested page size; defaults to 20, clamped to the configured ceiling.
  pub limit:     Option<i64>,
  /// Matching rows to skip; defaults to 0.
  pub offset:    Option<i64>,
  pub category:  Option<String>,
  /// Inclusive lower bound on `occurred_on` (ISO 8601 date).
  pub date_from: Option<NaiveDate>,
  /// Inclusive upper bound on `occurred_on`.
  pub date_to:   Option<NaiveDate>,
  /// Case-insensitive substring match over title or body.
  pub q:         Option<String>,
  /// `asc` or `desc` by creation time; default `desc`.
  pub order:     Option<SortOrder>,
}

/// `GET /api/stories[?limit=...][&offset=...][&category=...][&date_from=...][&date_to=...][&q=...][&order=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<StoryPage>, ApiError>
where
  S: StoryStore,
{
  let request = ListRequest::build(
    StoryFilter {
      category:  params.category,
      date_from: params.date_from,
      date_to:   params.date_to,
      q:         params.q,
    },
    params.limit,
    params.offset,
    params.order,
    state.validator.config(),
  )
  .map_err(ApiError::InvalidQuery)?;

  let page = state
    .store
    .list(&request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /api/stories/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Story>, ApiError>
where
  S: StoryStore,
{
  let story = state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("story {id} not found")))?;
  Ok(Json(story))
}
