//! The closed set of story category labels.
//!
//! The set is defined in exactly one place — an ordered [`CategorySet`] — and
//! consumed everywhere else: validation accepts only its members, and the
//! SQLite backend generates its CHECK constraint from [`CategorySet::sql_check_expr`].
//! Nothing hand-copies the labels.

use serde::{Deserialize, Serialize};

/// The labels shipped by default.
pub const DEFAULT_LABELS: &[&str] = &[
  "travel",
  "food",
  "history",
  "culture",
  "nature",
  "urban",
  "personal",
];

/// An ordered, immutable set of category labels.
///
/// Constructed once and injected into the [`Validator`](crate::validate::Validator)
/// and the storage backend — never referenced as ambient global state — so tests
/// can substitute an alternate label set without process-wide mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet(Vec<String>);

impl Default for CategorySet {
  fn default() -> Self {
    Self(DEFAULT_LABELS.iter().map(|l| (*l).to_owned()).collect())
  }
}

impl CategorySet {
  pub fn new<I, S>(labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(labels.into_iter().map(Into::into).collect())
  }

  /// All labels, in declaration order.
  pub fn labels(&self) -> &[String] { &self.0 }

  pub fn contains(&self, label: &str) -> bool {
    self.0.iter().any(|l| l == label)
  }

  /// SQL CHECK expression over `column`, e.g. `category IN ('travel', 'food')`.
  ///
  /// Labels come from configuration, never from request input, so quoting them
  /// directly into DDL is safe.
  pub fn sql_check_expr(&self, column: &str) -> String {
    let quoted: Vec<String> = self.0.iter().map(|l| format!("'{l}'")).collect();
    format!("{column} IN ({})", quoted.join(", "))
  }
}
