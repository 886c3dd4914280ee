//! The asset list as shown to the user: filtered, then sorted.

use std::sync::Arc;

use super::filter::{filter_assets, AssetFilter};
use super::memo::Memo;
use super::sort::{AssetField, AssetSorter, SortOrder};
use crate::api::types::Asset;

/// Filter + sort state for the asset table.
///
/// Rows are recomputed only when the records, the filter or the sort state
/// change structurally; otherwise the previous `Arc` is handed back.
#[derive(Debug, Default)]
pub struct AssetTable {
  sorter: AssetSorter,
  filter: AssetFilter,
  memo: Memo<Vec<Asset>>,
}

impl AssetTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_filter(mut self, filter: AssetFilter) -> Self {
    self.filter = filter;
    self
  }

  pub fn sorter(&self) -> &AssetSorter {
    &self.sorter
  }

  pub fn filter(&self) -> &AssetFilter {
    &self.filter
  }

  pub fn set_filter(&mut self, filter: AssetFilter) {
    self.filter = filter;
  }

  /// Select a sort column (toggles order on reselect).
  pub fn sort_by(&mut self, field: AssetField) {
    self.sorter.select(field);
  }

  /// Sort by `field` in the given order, regardless of the toggle state.
  pub fn sort_explicit(&mut self, field: AssetField, order: SortOrder) {
    self.sorter.select(field);
    if self.sorter.order() != order {
      self.sorter.select(field);
    }
  }

  pub fn reset_sort(&mut self) {
    self.sorter.reset();
  }

  pub fn rows(&mut self, records: &[Asset]) -> Arc<Vec<Asset>> {
    let sorter = self.sorter;
    let filter = &self.filter;
    let inputs = (records, filter, sorter.field(), sorter.order());

    self.memo.get_or_compute(&inputs, || {
      sorter.apply(&filter_assets(records, filter))
    })
  }

  pub fn computations(&self) -> u64 {
    self.memo.computations()
  }
}
