//! Listing-request types: filter predicates, pagination, and the validated
//! [`ListRequest`] handed to storage backends.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{config::CatalogConfig, error::QueryError, story::Story};

// ─── Sort order ──────────────────────────────────────────────────────────────

/// Sort direction over the creation timestamp (the only sort key).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// A set of independent, optional predicates, each ANDed in when present.
///
/// An inverted date range (`date_from > date_to`) is not an error — it simply
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryFilter {
  /// Exact category match.
  pub category:  Option<String>,
  /// `occurred_on >= date_from`, inclusive.
  pub date_from: Option<NaiveDate>,
  /// `occurred_on <= date_to`, inclusive.
  pub date_to:   Option<NaiveDate>,
  /// Case-insensitive substring match against title OR body.
  pub q:         Option<String>,
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// The effective pagination window: limit already clamped, offset checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
  pub limit:  i64,
  pub offset: i64,
  pub order:  SortOrder,
}

// ─── ListRequest ─────────────────────────────────────────────────────────────

/// A fully shape-checked listing request.
///
/// [`ListRequest::build`] is the only constructor; it applies defaults and the
/// server-side limit clamp, and rejects malformed parameters before any store
/// access is attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
  pub filter: StoryFilter,
  pub page:   Page,
}

impl ListRequest {
  pub fn build(
    filter: StoryFilter,
    limit: Option<i64>,
    offset: Option<i64>,
    order: Option<SortOrder>,
    config: &CatalogConfig,
  ) -> Result<Self, QueryError> {
    let limit = limit.unwrap_or(config.page_size_default);
    if limit <= 0 {
      return Err(QueryError::InvalidLimit(limit));
    }
    // Clamp, never reject: the ceiling bounds response cost regardless of
    // what the caller asks for.
    let limit = limit.min(config.page_size_max);

    let offset = offset.unwrap_or(0);
    if offset < 0 {
      return Err(QueryError::InvalidOffset(offset));
    }

    // Empty-string parameters are treated as absent.
    let StoryFilter { category, date_from, date_to, q } = filter;
    let category = category.filter(|c| !c.is_empty());
    let q = q.filter(|q| !q.is_empty());

    if let Some(category) = &category
      && !config.categories.contains(category)
    {
      return Err(QueryError::UnknownCategory(category.clone()));
    }

    Ok(Self {
      filter: StoryFilter { category, date_from, date_to, q },
      page:   Page {
        limit,
        offset,
        order: order.unwrap_or_default(),
      },
    })
  }
}

// ─── Result page ─────────────────────────────────────────────────────────────

/// One page of listing results.
///
/// `total` reflects the full filtered set regardless of the pagination window;
/// `limit` and `offset` echo the effective (post-clamp) values used.
#[derive(Debug, Clone, Serialize)]
pub struct StoryPage {
  pub items:  Vec<Story>,
  pub total:  i64,
  pub limit:  i64,
  pub offset: i64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::category::CategorySet;

  fn config() -> CatalogConfig { CatalogConfig::default() }

  #[test]
  fn defaults_applied_when_absent() {
    let req =
      ListRequest::build(StoryFilter::default(), None, None, None, &config())
        .unwrap();
    assert_eq!(req.page.limit, 20);
    assert_eq!(req.page.offset, 0);
    assert_eq!(req.page.order, SortOrder::Desc);
  }

  #[test]
  fn oversized_limit_is_clamped_to_ceiling() {
    let req = ListRequest::build(
      StoryFilter::default(),
      Some(500),
      None,
      None,
      &config(),
    )
    .unwrap();
    assert_eq!(req.page.limit, 100);
  }

  #[test]
  fn limit_at_ceiling_is_untouched() {
    let req = ListRequest::build(
      StoryFilter::default(),
      Some(100),
      Some(40),
      Some(SortOrder::Asc),
      &config(),
    )
    .unwrap();
    assert_eq!(req.page.limit, 100);
    assert_eq!(req.page.offset, 40);
    assert_eq!(req.page.order, SortOrder::Asc);
  }

  #[test]
  fn non_positive_limit_is_rejected() {
    for limit in [0, -1] {
      let err = ListRequest::build(
        StoryFilter::default(),
        Some(limit),
        None,
        None,
        &config(),
      )
      .unwrap_err();
      assert_eq!(err, QueryError::InvalidLimit(limit));
    }
  }

  #[test]
  fn negative_offset_is_rejected() {
    let err = ListRequest::build(
      StoryFilter::default(),
      None,
      Some(-5),
      None,
      &config(),
    )
    .unwrap_err();
    assert_eq!(err, QueryError::InvalidOffset(-5));
  }

  #[test]
  fn unknown_category_is_rejected() {
    let err = ListRequest::build(
      StoryFilter { category: Some("sports".into()), ..Default::default() },
      None,
      None,
      None,
      &config(),
    )
    .unwrap_err();
    assert_eq!(err, QueryError::UnknownCategory("sports".into()));
  }

  #[test]
  fn empty_string_parameters_are_treated_as_absent() {
    let req = ListRequest::build(
      StoryFilter {
        category: Some(String::new()),
        q: Some(String::new()),
        ..Default::default()
      },
      None,
      None,
      None,
      &config(),
    )
    .unwrap();
    assert_eq!(req.filter.category, None);
    assert_eq!(req.filter.q, None);
  }

  #[test]
  fn inverted_date_range_is_not_an_error() {
    let from = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let req = ListRequest::build(
      StoryFilter {
        date_from: Some(from),
        date_to: Some(to),
        ..Default::default()
      },
      None,
      None,
      None,
      &config(),
    )
    .unwrap();
    assert_eq!(req.filter.date_from, Some(from));
    assert_eq!(req.filter.date_to, Some(to));
  }

  #[test]
  fn alternate_config_changes_accepted_categories() {
    let config = CatalogConfig {
      categories: CategorySet::new(["fiction"]),
      ..CatalogConfig::default()
    };
    ListRequest::build(
      StoryFilter { category: Some("fiction".into()), ..Default::default() },
      None,
      None,
      None,
      &config,
    )
    .unwrap();
  }
}
