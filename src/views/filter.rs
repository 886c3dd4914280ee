//! Search and categorical filtering of asset records.

use serde::Serialize;

use crate::api::types::Asset;

/// Filter applied to the asset table before sorting.
///
/// Unset criteria match everything. Categorical criteria are exact,
/// case-sensitive matches; the search text is a case-insensitive substring
/// match over code, name, serial number, assignee and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetFilter {
  pub search: Option<String>,
  pub category: Option<String>,
  pub status: Option<String>,
  pub condition: Option<String>,
  pub department: Option<String>,
}

impl AssetFilter {
  pub fn with_search(mut self, text: impl Into<String>) -> Self {
    self.search = Some(text.into());
    self
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn with_status(mut self, status: impl Into<String>) -> Self {
    self.status = Some(status.into());
    self
  }

  pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
    self.condition = Some(condition.into());
    self
  }

  pub fn with_department(mut self, department: impl Into<String>) -> Self {
    self.department = Some(department.into());
    self
  }

  pub fn is_empty(&self) -> bool {
    self.needle().is_none()
      && self.category.is_none()
      && self.status.is_none()
      && self.condition.is_none()
      && self.department.is_none()
  }

  pub fn matches(&self, asset: &Asset) -> bool {
    self.matches_with(asset, self.needle().as_deref())
  }

  fn matches_with(&self, asset: &Asset, needle: Option<&str>) -> bool {
    exact(&self.category, &asset.category)
      && exact(&self.status, &asset.status)
      && exact(&self.condition, &asset.condition)
      && exact(&self.department, &asset.department)
      && needle.map_or(true, |needle| search_hit(asset, needle))
  }

  /// Lowercased search text, or `None` when blank.
  fn needle(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|text| !text.is_empty())
      .map(str::to_lowercase)
  }
}

fn exact(wanted: &Option<String>, actual: &str) -> bool {
  wanted.as_deref().map_or(true, |wanted| wanted == actual)
}

fn search_hit(asset: &Asset, needle: &str) -> bool {
  let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

  contains(&asset.asset_code)
    || contains(&asset.name)
    || asset.serial_number.as_deref().is_some_and(contains)
    || asset.assignee.as_deref().is_some_and(contains)
    || asset.tags.iter().any(|tag| contains(tag))
}

/// Return the records matching `filter`, in input order.
pub fn filter_assets(records: &[Asset], filter: &AssetFilter) -> Vec<Asset> {
  if filter.is_empty() {
    return records.to_vec();
  }

  let needle = filter.needle();
  records
    .iter()
    .filter(|asset| filter.matches_with(asset, needle.as_deref()))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fixtures() -> Vec<Asset> {
    vec![
      Asset {
        id: "1".into(),
        asset_code: "LAP-001".into(),
        name: "ThinkPad X1".into(),
        category: "Laptop".into(),
        status: "In use".into(),
        department: "Eng".into(),
        assignee: Some("Ana Silva".into()),
        tags: vec!["portable".into()],
        ..Default::default()
      },
      Asset {
        id: "2".into(),
        asset_code: "CHR-014".into(),
        name: "Desk chair".into(),
        category: "Furniture".into(),
        status: "Stored".into(),
        department: "Ops".into(),
        serial_number: Some("SN-99812".into()),
        ..Default::default()
      },
      Asset {
        id: "3".into(),
        asset_code: "LAP-002".into(),
        name: "MacBook Pro".into(),
        category: "Laptop".into(),
        status: "Stored".into(),
        department: "Ops".into(),
        ..Default::default()
      },
    ]
  }

  fn ids(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.id.as_str()).collect()
  }

  #[test]
  fn test_empty_filter_returns_everything() {
    let assets = fixtures();
    let filter = AssetFilter::default().with_search("   ");

    assert!(filter.is_empty());
    assert_eq!(ids(&filter_assets(&assets, &filter)), vec!["1", "2", "3"]);
  }

  #[test]
  fn test_search_is_case_insensitive_across_fields() {
    let assets = fixtures();

    let by_code = filter_assets(&assets, &AssetFilter::default().with_search("lap-"));
    assert_eq!(ids(&by_code), vec!["1", "3"]);

    let by_serial = filter_assets(&assets, &AssetFilter::default().with_search("sn-998"));
    assert_eq!(ids(&by_serial), vec!["2"]);

    let by_assignee = filter_assets(&assets, &AssetFilter::default().with_search("SILVA"));
    assert_eq!(ids(&by_assignee), vec!["1"]);

    let by_tag = filter_assets(&assets, &AssetFilter::default().with_search("Portable"));
    assert_eq!(ids(&by_tag), vec!["1"]);
  }

  #[test]
  fn test_categorical_criteria_combine() {
    let assets = fixtures();
    let filter = AssetFilter::default()
      .with_category("Laptop")
      .with_status("Stored");

    let matched = filter_assets(&assets, &filter);

    assert_eq!(ids(&matched), vec!["3"]);
    assert!(filter.matches(&assets[2]));
    assert!(!filter.matches(&assets[0]));
  }

  #[test]
  fn test_categorical_match_is_case_sensitive() {
    let assets = fixtures();

    let matched = filter_assets(&assets, &AssetFilter::default().with_department("eng"));

    assert!(matched.is_empty());
  }
}
