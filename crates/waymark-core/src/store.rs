//! The `StoryStore` trait and backend error classification.
//!
//! The trait is implemented by storage backends (e.g. `waymark-store-sqlite`).
//! Higher layers (`waymark-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  query::{ListRequest, StoryPage},
  story::{NewStory, Story},
};

// ─── Failure classification ──────────────────────────────────────────────────

/// Coarse classification of a backend failure, used by callers to decide how
/// to report it and whether retrying can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The backend rejected a write through one of its own constraints. This
  /// should only occur if validation and storage constraints have drifted, or
  /// the validation step was bypassed; it is never transient and must not be
  /// retried. `field` is the backend's best guess at the offending field.
  Constraint { field: Option<&'static str> },
  /// Connectivity, lock contention, or timeout. Callers may retry with
  /// backoff; the store itself never retries, to avoid duplicate inserts.
  Unavailable,
  /// Anything else — a bug or corrupted state.
  Internal,
}

/// Implemented by every backend error type so callers can classify failures
/// without knowing the concrete backend.
pub trait StoreError: std::error::Error {
  fn failure_kind(&self) -> FailureKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a story catalog backend.
///
/// Every call is an independent unit of work against the shared store; there
/// is no cross-request in-memory state and no caching — each `list` re-runs
/// its count-and-fetch pair.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StoryStore: Send + Sync {
  type Error: StoreError + Send + Sync + 'static;

  /// Persist a validated story and return it with its store-assigned id and
  /// timestamps. Runs as a single atomic unit: either the row exists with all
  /// fields set, or nothing is persisted.
  fn create(
    &self,
    story: NewStory,
    owner_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Story, Self::Error>> + Send + '_;

  /// Retrieve a story by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Story>, Self::Error>> + Send + '_;

  /// Execute a listing request: count the full filtered set, then fetch the
  /// ordered page. `total` in the returned page is independent of the
  /// pagination window.
  fn list<'a>(
    &'a self,
    request: &'a ListRequest,
  ) -> impl Future<Output = Result<StoryPage, Self::Error>> + Send + 'a;
}
