//! Cache keys for the console's reference collections.

use crate::cache::CacheKey;
use crate::config::Endpoints;

/// The reference collections kept in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
  Categories,
  ConditionOptions,
  StatusOptions,
}

impl ReferenceKind {
  pub const ALL: [ReferenceKind; 3] = [
    ReferenceKind::Categories,
    ReferenceKind::ConditionOptions,
    ReferenceKind::StatusOptions,
  ];

  /// Endpoint path the collection is fetched from.
  pub fn path(self, endpoints: &Endpoints) -> &str {
    match self {
      Self::Categories => &endpoints.categories,
      Self::ConditionOptions => &endpoints.condition_options,
      Self::StatusOptions => &endpoints.status_options,
    }
  }

  /// Heading used when printing the collection.
  pub fn title(self) -> &'static str {
    match self {
      Self::Categories => "Categories",
      Self::ConditionOptions => "Condition options",
      Self::StatusOptions => "Status options",
    }
  }
}

impl CacheKey for ReferenceKind {
  fn describe(&self) -> &'static str {
    match self {
      Self::Categories => "categories",
      Self::ConditionOptions => "condition_options",
      Self::StatusOptions => "status_options",
    }
  }
}
