//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings at fixed microsecond precision
//! so the TEXT column's lexicographic order matches chronological order (the
//! `created_at` ORDER BY relies on this). Calendar dates are stored as plain
//! ISO 8601 dates. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;
use waymark_core::story::Story;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `stories` row.
pub struct RawStory {
  pub id:          String,
  pub owner_id:    Option<String>,
  pub title:       String,
  pub body:        Option<String>,
  pub category:    Option<String>,
  pub latitude:    f64,
  pub longitude:   f64,
  pub occurred_on: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawStory {
  /// Column list matching the field order expected by [`RawStory::from_row`].
  pub const COLUMNS: &'static str =
    "id, owner_id, title, body, category, latitude, longitude, \
     occurred_on, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      owner_id:    row.get(1)?,
      title:       row.get(2)?,
      body:        row.get(3)?,
      category:    row.get(4)?,
      latitude:    row.get(5)?,
      longitude:   row.get(6)?,
      occurred_on: row.get(7)?,
      created_at:  row.get(8)?,
      updated_at:  row.get(9)?,
    })
  }

  pub fn into_story(self) -> Result<Story> {
    Ok(Story {
      id:          decode_uuid(&self.id)?,
      owner_id:    self.owner_id.as_deref().map(decode_uuid).transpose()?,
      title:       self.title,
      body:        self.body,
      category:    self.category,
      latitude:    self.latitude,
      longitude:   self.longitude,
      occurred_on: self.occurred_on.as_deref().map(decode_date).transpose()?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
