//! [`SqliteStore`] — the SQLite implementation of [`StoryStore`].

use std::path::Path;

use chrono::{DurationRound as _, TimeDelta, Utc};
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;
use waymark_core::{
  config::CatalogConfig,
  query::{ListRequest, Page, SortOrder, StoryPage},
  store::StoryStore,
  story::{NewStory, Story},
};

use crate::{
  Error, Result,
  encode::{RawStory, encode_date, encode_dt, encode_uuid},
  schema::schema_sql,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A story catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The schema
/// (including its CHECK constraints) is generated from the [`CatalogConfig`]
/// passed at open time, so storage enforces the same rules the validator does.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(
    path: impl AsRef<Path>,
    config: &CatalogConfig,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(config).await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(config: &CatalogConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(config).await?;
    Ok(store)
  }

  async fn init_schema(&self, config: &CatalogConfig) -> Result<()> {
    let ddl = schema_sql(config);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StoryStore impl ─────────────────────────────────────────────────────────

impl StoryStore for SqliteStore {
  type Error = Error;

  async fn create(
    &self,
    input: NewStory,
    owner_id: Option<Uuid>,
  ) -> Result<Story> {
    // Truncate to the stored (microsecond) precision so the returned story
    // compares equal to what a later read decodes.
    let now = Utc::now();
    let now = now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now);
    let story = Story {
      id: Uuid::new_v4(),
      owner_id,
      title: input.title,
      body: input.body,
      category: input.category,
      latitude: input.latitude,
      longitude: input.longitude,
      occurred_on: input.occurred_on,
      created_at: now,
      updated_at: now,
    };

    let id_str       = encode_uuid(story.id);
    let owner_str    = story.owner_id.map(encode_uuid);
    let title        = story.title.clone();
    let body         = story.body.clone();
    let category     = story.category.clone();
    let latitude     = story.latitude;
    let longitude    = story.longitude;
    let occurred_str = story.occurred_on.map(encode_date);
    let created_str  = encode_dt(story.created_at);
    let updated_str  = encode_dt(story.updated_at);

    self
      .conn
      .call(move |conn| {
        // Scoped to the single insert: either the row exists with all fields
        // set, or nothing is persisted.
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO stories (
             id, owner_id, title, body, category,
             latitude, longitude, occurred_on, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            owner_str,
            title,
            body,
            category,
            latitude,
            longitude,
            occurred_str,
            created_str,
            updated_str,
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(story)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Story>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM stories WHERE id = ?1",
                RawStory::COLUMNS
              ),
              rusqlite::params![id_str],
              RawStory::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStory::into_story).transpose()
  }

  async fn list(&self, request: &ListRequest) -> Result<StoryPage> {
    // Owned copies that can move into the connection closure.
    let category  = request.filter.category.clone();
    let date_from = request.filter.date_from.map(encode_date);
    let date_to   = request.filter.date_to.map(encode_date);
    let pattern   = request.filter.q.as_deref().map(|q| format!("%{q}%"));

    let Page { limit, offset, order } = request.page;
    let dir = match order {
      SortOrder::Asc => "ASC",
      SortOrder::Desc => "DESC",
    };

    let (raws, total) = self
      .conn
      .call(move |conn| {
        // Build the predicate list once, left to right; only filters that are
        // present contribute, so the generated SQL stays minimal. User values
        // are always bound as parameters, never spliced into the text.
        let mut conds: Vec<&'static str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(c) = category {
          conds.push("category = ?");
          params.push(Value::Text(c));
        }
        if let Some(d) = date_from {
          conds.push("occurred_on >= ?");
          params.push(Value::Text(d));
        }
        if let Some(d) = date_to {
          conds.push("occurred_on <= ?");
          params.push(Value::Text(d));
        }
        if let Some(p) = pattern {
          // SQLite LIKE is case-insensitive for ASCII by default, matching
          // the case-insensitive substring contract.
          conds.push("(title LIKE ? OR body LIKE ?)");
          params.push(Value::Text(p.clone()));
          params.push(Value::Text(p));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        // Count the full filtered set before any pagination is applied.
        // Counting the limited result instead would collapse `total` to the
        // page length and break pagination.
        let count_sql = format!("SELECT COUNT(*) FROM stories {where_clause}");
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(params.clone()),
          |row| row.get(0),
        )?;

        // Ordering first, then LIMIT, then OFFSET. The secondary `id` key
        // makes pagination deterministic when creation timestamps collide.
        let fetch_sql = format!(
          "SELECT {cols} FROM stories {where_clause}
           ORDER BY created_at {dir}, id {dir}
           LIMIT ? OFFSET ?",
          cols = RawStory::COLUMNS,
        );
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&fetch_sql)?;
        let raws = stmt
          .query_map(
            rusqlite::params_from_iter(params),
            RawStory::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((raws, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawStory::into_story)
      .collect::<Result<Vec<_>>>()?;

    Ok(StoryPage { items, total, limit, offset })
  }
}
