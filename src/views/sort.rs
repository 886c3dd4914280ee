//! Stable, field-configurable ordering of asset records.

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::api::types::Asset;

/// Asset columns the table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetField {
  AssetCode,
  Name,
  Category,
  Status,
  Condition,
  Department,
  Assignee,
  Value,
  PurchaseDate,
  WarrantyExpiry,
  CreatedAt,
  UpdatedAt,
}

impl AssetField {
  pub const ALL: [AssetField; 12] = [
    AssetField::AssetCode,
    AssetField::Name,
    AssetField::Category,
    AssetField::Status,
    AssetField::Condition,
    AssetField::Department,
    AssetField::Assignee,
    AssetField::Value,
    AssetField::PurchaseDate,
    AssetField::WarrantyExpiry,
    AssetField::CreatedAt,
    AssetField::UpdatedAt,
  ];

  /// Wire name of the field (camelCase)
  pub fn name(self) -> &'static str {
    match self {
      Self::AssetCode => "assetCode",
      Self::Name => "name",
      Self::Category => "category",
      Self::Status => "status",
      Self::Condition => "condition",
      Self::Department => "department",
      Self::Assignee => "assignee",
      Self::Value => "value",
      Self::PurchaseDate => "purchaseDate",
      Self::WarrantyExpiry => "warrantyExpiry",
      Self::CreatedAt => "createdAt",
      Self::UpdatedAt => "updatedAt",
    }
  }
}

impl fmt::Display for AssetField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown asset field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for AssetField {
  type Err = UnknownField;

  /// Accepts the wire name in any case, with or without `-`/`_` separators.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted: String = s
      .chars()
      .filter(|c| *c != '-' && *c != '_')
      .flat_map(char::to_lowercase)
      .collect();

    if wanted == "code" {
      return Ok(Self::AssetCode);
    }

    Self::ALL
      .into_iter()
      .find(|field| field.name().to_lowercase() == wanted)
      .ok_or_else(|| UnknownField(s.to_string()))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortOrder {
  #[default]
  Ascending,
  Descending,
}

impl SortOrder {
  pub fn reversed(self) -> Self {
    match self {
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Ascending,
    }
  }

  fn apply(self, ordering: Ordering) -> Ordering {
    match self {
      Self::Ascending => ordering,
      Self::Descending => ordering.reverse(),
    }
  }
}

/// Compare two assets on `field` in ascending order.
///
/// Text compares case-insensitively, numbers numerically, dates
/// chronologically. Missing values come after present ones.
pub fn compare_assets(a: &Asset, b: &Asset, field: AssetField) -> Ordering {
  match field {
    AssetField::AssetCode => compare_text(&a.asset_code, &b.asset_code),
    AssetField::Name => compare_text(&a.name, &b.name),
    AssetField::Category => compare_text(&a.category, &b.category),
    AssetField::Status => compare_text(&a.status, &b.status),
    AssetField::Condition => compare_text(&a.condition, &b.condition),
    AssetField::Department => compare_text(&a.department, &b.department),
    AssetField::Assignee => {
      missing_last(a.assignee.as_deref(), b.assignee.as_deref(), compare_text)
    }
    AssetField::Value => missing_last(a.value, b.value, |x, y| x.total_cmp(&y)),
    AssetField::PurchaseDate => missing_last(a.purchase_date, b.purchase_date, |x, y| x.cmp(&y)),
    AssetField::WarrantyExpiry => {
      missing_last(a.warranty_expiry, b.warranty_expiry, |x, y| x.cmp(&y))
    }
    AssetField::CreatedAt => missing_last(a.created_at, b.created_at, |x, y| x.cmp(&y)),
    AssetField::UpdatedAt => missing_last(a.updated_at, b.updated_at, |x, y| x.cmp(&y)),
  }
}

thread_local! {
  static COLLATOR: Option<Collator> = {
    let mut options = CollatorOptions::new();
    // Secondary: accents matter, case does not
    options.strength = Some(Strength::Secondary);
    Collator::try_new(&Default::default(), options).ok()
  };
}

/// Unicode collation ignoring case, so "apple" and "Apple" tie and "Ábaco"
/// sorts with the other a-words.
fn compare_text(a: &str, b: &str) -> Ordering {
  COLLATOR.with(|collator| match collator {
    Some(collator) => collator.compare(a, b),
    None => a
      .chars()
      .flat_map(char::to_lowercase)
      .cmp(b.chars().flat_map(char::to_lowercase)),
  })
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => cmp(a, b),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Return `records` ordered by `field`. Stable; the input is left untouched.
pub fn sort_assets(records: &[Asset], field: AssetField, order: SortOrder) -> Vec<Asset> {
  let mut sorted = records.to_vec();
  sorted.sort_by(|a, b| order.apply(compare_assets(a, b, field)));
  sorted
}

/// Result of a sort request
#[derive(Debug, Clone, PartialEq)]
pub struct SortedAssets {
  pub field: AssetField,
  pub order: SortOrder,
  pub sorted: Vec<Asset>,
}

/// Sort key selection with toggle-on-reselect behavior.
///
/// Selecting the field that is already selected flips the order; selecting
/// another field makes it the key in ascending order. The initial and reset
/// state is `assetCode` ascending with no field selected yet, so the first
/// explicit selection of `assetCode` sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSorter {
  field: AssetField,
  order: SortOrder,
  selected: bool,
}

impl Default for AssetSorter {
  fn default() -> Self {
    Self {
      field: AssetField::AssetCode,
      order: SortOrder::Ascending,
      selected: false,
    }
  }
}

impl AssetSorter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn field(&self) -> AssetField {
    self.field
  }

  pub fn order(&self) -> SortOrder {
    self.order
  }

  /// Apply a column selection to the sort state.
  pub fn select(&mut self, field: AssetField) {
    if self.selected && self.field == field {
      self.order = self.order.reversed();
    } else {
      self.field = field;
      self.order = SortOrder::Ascending;
      self.selected = true;
    }
  }

  /// Back to `assetCode` ascending.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// Order `records` by the current state.
  pub fn apply(&self, records: &[Asset]) -> Vec<Asset> {
    sort_assets(records, self.field, self.order)
  }

  /// Select `field` and return the records ordered by the resulting state.
  pub fn sort(&mut self, records: &[Asset], field: AssetField) -> SortedAssets {
    self.select(field);
    SortedAssets {
      field: self.field,
      order: self.order,
      sorted: self.apply(records),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn asset(code: &str) -> Asset {
    Asset {
      id: code.to_string(),
      asset_code: code.to_string(),
      ..Default::default()
    }
  }

  fn codes(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.asset_code.as_str()).collect()
  }

  fn ids(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.id.as_str()).collect()
  }

  #[test]
  fn test_toggle_sort_scenario() {
    let assets = vec![asset("B"), asset("A"), asset("C")];
    let mut sorter = AssetSorter::new();

    let first = sorter.sort(&assets, "code".parse().unwrap());
    assert_eq!(first.field, AssetField::AssetCode);
    assert_eq!(first.order, SortOrder::Ascending);
    assert_eq!(codes(&first.sorted), vec!["A", "B", "C"]);

    let second = sorter.sort(&first.sorted, AssetField::AssetCode);
    assert_eq!(second.order, SortOrder::Descending);
    assert_eq!(codes(&second.sorted), vec!["C", "B", "A"]);

    // Input untouched
    assert_eq!(codes(&assets), vec!["B", "A", "C"]);
  }

  #[test]
  fn test_new_field_resets_to_ascending() {
    let mut sorter = AssetSorter::new();
    sorter.select(AssetField::Name);
    sorter.select(AssetField::Name);
    assert_eq!(sorter.order(), SortOrder::Descending);

    sorter.select(AssetField::Value);
    assert_eq!(sorter.field(), AssetField::Value);
    assert_eq!(sorter.order(), SortOrder::Ascending);
  }

  #[test]
  fn test_reset_restores_asset_code_ascending() {
    let mut sorter = AssetSorter::new();
    sorter.select(AssetField::Status);
    sorter.select(AssetField::Status);

    sorter.reset();

    assert_eq!(sorter.field(), AssetField::AssetCode);
    assert_eq!(sorter.order(), SortOrder::Ascending);
    assert_eq!(sorter, AssetSorter::default());
  }

  #[test]
  fn test_equal_keys_keep_input_order() {
    let assets: Vec<Asset> = [("1", "Laptop"), ("2", "Chair"), ("3", "Laptop"), ("4", "Chair")]
      .into_iter()
      .map(|(id, category)| Asset {
        id: id.to_string(),
        category: category.to_string(),
        ..Default::default()
      })
      .collect();

    let asc = sort_assets(&assets, AssetField::Category, SortOrder::Ascending);
    assert_eq!(ids(&asc), vec!["2", "4", "1", "3"]);

    let desc = sort_assets(&assets, AssetField::Category, SortOrder::Descending);
    assert_eq!(ids(&desc), vec!["1", "3", "2", "4"]);
  }

  #[test]
  fn test_text_ignores_case() {
    let assets = vec![asset("banana"), asset("Apple"), asset("cherry"), asset("apple")];

    let sorted = sort_assets(&assets, AssetField::AssetCode, SortOrder::Ascending);

    assert_eq!(codes(&sorted), vec!["Apple", "apple", "banana", "cherry"]);
  }

  #[test]
  fn test_accented_text_sorts_with_its_base_letter() {
    let assets = vec![asset("zebra"), asset("Éclair"), asset("Ábaco"), asset("apple")];

    let sorted = sort_assets(&assets, AssetField::AssetCode, SortOrder::Ascending);

    assert_eq!(codes(&sorted), vec!["Ábaco", "apple", "Éclair", "zebra"]);
    assert_eq!(compare_text("Ábaco", "zebra"), Ordering::Less);
  }

  #[test]
  fn test_numeric_field_compares_numerically() {
    let assets: Vec<Asset> = [("a", 900.0), ("b", 10_000.0), ("c", 25.5)]
      .into_iter()
      .map(|(id, value)| Asset {
        id: id.to_string(),
        value: Some(value),
        ..Default::default()
      })
      .collect();

    let sorted = sort_assets(&assets, AssetField::Value, SortOrder::Ascending);

    assert_eq!(ids(&sorted), vec!["c", "a", "b"]);
  }

  #[test]
  fn test_date_field_compares_chronologically() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    let assets = vec![
      Asset {
        id: "dec-2023".into(),
        purchase_date: date(2023, 12, 1),
        ..Default::default()
      },
      Asset {
        id: "feb-2024".into(),
        purchase_date: date(2024, 2, 1),
        ..Default::default()
      },
      Asset {
        id: "sep-2023".into(),
        purchase_date: date(2023, 9, 30),
        ..Default::default()
      },
    ];

    let sorted = sort_assets(&assets, AssetField::PurchaseDate, SortOrder::Ascending);

    assert_eq!(ids(&sorted), vec!["sep-2023", "dec-2023", "feb-2024"]);
  }

  #[test]
  fn test_missing_values_last_ascending_first_descending() {
    let assets = vec![
      Asset {
        id: "none".into(),
        ..Default::default()
      },
      Asset {
        id: "bo".into(),
        assignee: Some("Bo".into()),
        ..Default::default()
      },
      Asset {
        id: "ana".into(),
        assignee: Some("ana".into()),
        ..Default::default()
      },
    ];

    let asc = sort_assets(&assets, AssetField::Assignee, SortOrder::Ascending);
    assert_eq!(ids(&asc), vec!["ana", "bo", "none"]);

    let desc = sort_assets(&assets, AssetField::Assignee, SortOrder::Descending);
    assert_eq!(ids(&desc), vec!["none", "bo", "ana"]);
  }

  #[test]
  fn test_repeatable_and_reversible() {
    let assets = vec![asset("D"), asset("b"), asset("A"), asset("c")];

    let once = sort_assets(&assets, AssetField::AssetCode, SortOrder::Ascending);
    let twice = sort_assets(&assets, AssetField::AssetCode, SortOrder::Ascending);
    assert_eq!(once, twice);

    let mut reversed = sort_assets(&assets, AssetField::AssetCode, SortOrder::Descending);
    reversed.reverse();
    assert_eq!(once, reversed);
  }

  #[test]
  fn test_empty_input() {
    let mut sorter = AssetSorter::new();

    let result = sorter.sort(&[], AssetField::Name);

    assert!(result.sorted.is_empty());
  }

  #[test]
  fn test_field_parsing() {
    assert_eq!("assetCode".parse::<AssetField>(), Ok(AssetField::AssetCode));
    assert_eq!("purchase-date".parse::<AssetField>(), Ok(AssetField::PurchaseDate));
    assert_eq!("UPDATED_AT".parse::<AssetField>(), Ok(AssetField::UpdatedAt));
    assert_eq!(
      "colour".parse::<AssetField>(),
      Err(UnknownField("colour".to_string()))
    );
  }
}
