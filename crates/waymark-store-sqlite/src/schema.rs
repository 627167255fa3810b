//! SQL schema for the Waymark SQLite store.
//!
//! The DDL is generated from [`CatalogConfig`] at connection startup so the
//! CHECK constraints can never drift from the validation rules: the category
//! list, length bounds, and coordinate ranges all come from the same
//! configuration value the validator consumes.
//!
//! Constraint names are load-bearing: [`crate::error`] maps a rejected write
//! back to its offending field by matching them in the SQLite error message.

use waymark_core::{
  config::CatalogConfig,
  validate::{LATITUDE_RANGE, LONGITUDE_RANGE},
};

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub fn schema_sql(config: &CatalogConfig) -> String {
  let category_check = config.categories.sql_check_expr("category");
  let title_max = config.title_max_len;
  let body_max = config.body_max_len;
  let (lat_min, lat_max) = LATITUDE_RANGE;
  let (lng_min, lng_max) = LONGITUDE_RANGE;

  format!(
    "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS stories (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT,            -- external account reference; NULL = anonymous
    title       TEXT NOT NULL,
    body        TEXT,
    category    TEXT,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    occurred_on TEXT,            -- ISO 8601 date or NULL
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    updated_at  TEXT NOT NULL,
    CONSTRAINT stories_title_check     CHECK (length(trim(title)) > 0 AND length(title) <= {title_max}),
    CONSTRAINT stories_body_check      CHECK (body IS NULL OR length(body) <= {body_max}),
    CONSTRAINT stories_category_check  CHECK (category IS NULL OR {category_check}),
    CONSTRAINT stories_latitude_check  CHECK (latitude  >= {lat_min} AND latitude  <= {lat_max}),
    CONSTRAINT stories_longitude_check CHECK (longitude >= {lng_min} AND longitude <= {lng_max})
);

CREATE INDEX IF NOT EXISTS stories_created_idx  ON stories(created_at);
CREATE INDEX IF NOT EXISTS stories_category_idx ON stories(category);
CREATE INDEX IF NOT EXISTS stories_occurred_idx ON stories(occurred_on);

PRAGMA user_version = 1;
"
  )
}
