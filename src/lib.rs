//! Data layer of the asset management console.
//!
//! Reference collections (categories, condition and status options) are held
//! in a read-through [`cache::CacheStore`] with a freshness window. Asset
//! lists are sorted, filtered and aggregated by the pure functions in
//! [`views`], and [`dialog`] assembles the bundle the create/detail dialogs
//! render from.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod dialog;
pub mod logging;
pub mod query;
pub mod views;
