//! Catalog-wide limits and the injected category set.

use crate::category::CategorySet;

/// Immutable configuration shared by the validator, the query builder, and
/// schema generation. Constructed once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
  pub categories:        CategorySet,
  /// Maximum `title` length in characters.
  pub title_max_len:     usize,
  /// Maximum `body` length in characters. Exists purely to block
  /// unbounded-payload abuse, not to express a domain rule.
  pub body_max_len:      usize,
  /// Page size used when a caller does not supply one.
  pub page_size_default: i64,
  /// Hard ceiling on the page size; larger requests are clamped, not rejected.
  pub page_size_max:     i64,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      categories:        CategorySet::default(),
      title_max_len:     500,
      body_max_len:      50_000,
      page_size_default: 20,
      page_size_max:     100,
    }
  }
}
