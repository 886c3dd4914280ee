//! Derived, synchronous views over fetched records.

mod aggregate;
mod filter;
mod memo;
mod sort;
mod table;

pub use aggregate::{
  aggregate_assets_by_department, aggregate_by_department, DepartmentGroup, DepartmentStats,
  DepartmentSummary,
};
pub use filter::{filter_assets, AssetFilter};
pub use memo::{structural_hash, Memo};
pub use sort::{
  compare_assets, sort_assets, AssetField, AssetSorter, SortOrder, SortedAssets, UnknownField,
};
pub use table::AssetTable;
