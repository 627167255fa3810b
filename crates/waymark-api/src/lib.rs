//! JSON REST API for the Waymark story catalog.
//!
//! Exposes an axum [`Router`] backed by any [`waymark_core::store::StoryStore`].
//! TLS and transport concerns are the caller's responsibility.

pub mod error;
pub mod stories;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::json;
use waymark_core::{store::StoryStore, validate::Validator};

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `WAYMARK_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("waymark.db") }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: StoryStore> {
  pub store:     Arc<S>,
  pub validator: Arc<Validator>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: StoryStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/api/stories",
      get(stories::list::<S>).post(stories::create::<S>),
    )
    .route("/api/stories/{id}", get(stories::get_one::<S>))
    .route("/health", get(health))
    .with_state(state)
}

/// `GET /health` — liveness probe.
async fn health() -> Json<serde_json::Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use waymark_core::{
    config::CatalogConfig,
    query::{ListRequest, StoryPage},
    story::{NewStory, Story},
  };
  use waymark_store_sqlite::SqliteStore;

  use super::*;

  async fn make_state() -> AppState<SqliteStore> {
    let config = CatalogConfig::default();
    let store = SqliteStore::open_in_memory(&config).await.unwrap();
    AppState {
      store:     Arc::new(store),
      validator: Arc::new(Validator::new(config)),
    }
  }

  async fn send<S>(
    state: AppState<S>,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: Option<serde_json::Value>,
  ) -> (StatusCode, serde_json::Value)
  where
    S: StoryStore + Clone + Send + Sync + 'static,
  {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = api_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
  }

  fn golden_gate() -> serde_json::Value {
    json!({
      "title": "Golden Gate Bridge at Sunset",
      "body": "Fog rolled in just before dusk.",
      "category": "travel",
      "latitude": 37.8199,
      "longitude": -122.4783,
    })
  }

  // ── Health ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let (status, body) =
      send(make_state().await, "GET", "/health", vec![], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
  }

  // ── Create ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_assigned_fields() {
    let (status, body) = send(
      make_state().await,
      "POST",
      "/api/stories",
      vec![],
      Some(golden_gate()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
    assert_eq!(body["owner_id"], serde_json::Value::Null);
    assert_eq!(body["title"], "Golden Gate Bridge at Sunset");
  }

  #[tokio::test]
  async fn create_honours_owner_header() {
    let owner = Uuid::new_v4();
    let owner_str = owner.to_string();
    let (status, body) = send(
      make_state().await,
      "POST",
      "/api/stories",
      vec![(header::HeaderName::from_static("x-owner-id"), &owner_str)],
      Some(golden_gate()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"], owner_str);
  }

  #[tokio::test]
  async fn create_rejects_malformed_owner_header() {
    let (status, body) = send(
      make_state().await,
      "POST",
      "/api/stories",
      vec![(header::HeaderName::from_static("x-owner-id"), "not-a-uuid")],
      Some(golden_gate()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
  }

  #[tokio::test]
  async fn create_validation_failure_lists_every_offending_field() {
    let (status, body) = send(
      make_state().await,
      "POST",
      "/api/stories",
      vec![],
      Some(json!({
        "title": "   ",
        "category": "sports",
        "latitude": 99.0,
        "longitude": -122.4783,
      })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    let fields: Vec<&str> = body["fields"]
      .as_array()
      .unwrap()
      .iter()
      .map(|f| f["field"].as_str().unwrap())
      .collect();
    assert_eq!(fields, ["title", "category", "latitude"]);
  }

  #[tokio::test]
  async fn invalid_payload_never_touches_storage() {
    let config = CatalogConfig::default();
    let counting = CountingStore {
      inner: SqliteStore::open_in_memory(&config).await.unwrap(),
      calls: Arc::new(AtomicUsize::new(0)),
    };
    let calls = counting.calls.clone();
    let state = AppState {
      store:     Arc::new(counting),
      validator: Arc::new(Validator::new(config)),
    };

    let (status, _) = send(
      state,
      "POST",
      "/api/stories",
      vec![],
      Some(json!({
        "title": "Pickup game",
        "category": "sports",
        "latitude": 0.0,
        "longitude": 0.0,
      })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  // ── List ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_applies_defaults_and_echoes_them() {
    let state = make_state().await;
    for _ in 0..3 {
      send(state.clone(), "POST", "/api/stories", vec![], Some(golden_gate()))
        .await;
    }

    let (status, body) =
      send(state, "GET", "/api/stories", vec![], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn list_clamps_oversized_limit() {
    let state = make_state().await;
    send(state.clone(), "POST", "/api/stories", vec![], Some(golden_gate()))
      .await;

    let (status, body) =
      send(state, "GET", "/api/stories?limit=500", vec![], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn list_rejects_malformed_parameters() {
    for uri in [
      "/api/stories?limit=0",
      "/api/stories?limit=-3",
      "/api/stories?offset=-1",
      "/api/stories?category=sports",
      "/api/stories?date_from=not-a-date",
      "/api/stories?order=sideways",
    ] {
      let (status, body) =
        send(make_state().await, "GET", uri, vec![], None).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} -> {body}");
    }
  }

  #[tokio::test]
  async fn list_filters_by_category() {
    let state = make_state().await;
    send(state.clone(), "POST", "/api/stories", vec![], Some(golden_gate()))
      .await;

    let (_, travel) = send(
      state.clone(),
      "GET",
      "/api/stories?category=travel",
      vec![],
      None,
    )
    .await;
    assert_eq!(travel["total"], 1);
    assert_eq!(
      travel["items"][0]["title"],
      "Golden Gate Bridge at Sunset"
    );

    let (_, food) =
      send(state, "GET", "/api/stories?category=food", vec![], None).await;
    assert_eq!(food["total"], 0);
  }

  #[tokio::test]
  async fn list_search_is_case_insensitive() {
    let state = make_state().await;
    send(
      state.clone(),
      "POST",
      "/api/stories",
      vec![],
      Some(json!({
        "title": "Naples backstreets",
        "body": "The best margherita I have ever had.",
        "latitude": 40.8518,
        "longitude": 14.2681,
      })),
    )
    .await;

    let (_, hit) =
      send(state.clone(), "GET", "/api/stories?q=MARGHERITA", vec![], None)
        .await;
    assert_eq!(hit["total"], 1);

    let (_, miss) =
      send(state, "GET", "/api/stories?q=pizza", vec![], None).await;
    assert_eq!(miss["total"], 0);
  }

  // ── Get one ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_one_roundtrips_and_missing_is_404() {
    let state = make_state().await;
    let (_, created) = send(
      state.clone(),
      "POST",
      "/api/stories",
      vec![],
      Some(golden_gate()),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) =
      send(state.clone(), "GET", &format!("/api/stories/{id}"), vec![], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);

    let (status, _) = send(
      state,
      "GET",
      &format!("/api/stories/{}", Uuid::new_v4()),
      vec![],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Storage-call counting double ───────────────────────────────────────────

  #[derive(Clone)]
  struct CountingStore {
    inner: SqliteStore,
    calls: Arc<AtomicUsize>,
  }

  impl StoryStore for CountingStore {
    type Error = waymark_store_sqlite::Error;

    async fn create(
      &self,
      story: NewStory,
      owner_id: Option<Uuid>,
    ) -> Result<Story, Self::Error> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.inner.create(story, owner_id).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Story>, Self::Error> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.inner.get(id).await
    }

    async fn list(
      &self,
      request: &ListRequest,
    ) -> Result<StoryPage, Self::Error> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.inner.list(request).await
    }
  }
}
