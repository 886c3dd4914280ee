//! Console client with the reference collections behind a read-through cache.

use color_eyre::Result;
use futures::future::FutureExt;
use std::sync::Arc;
use tracing::warn;

use crate::cache::{CacheOptions, CacheStore, FetchError, Snapshot};
use crate::config::{Config, Endpoints};
use crate::dialog::DialogSources;
use crate::query::Subscription;

use super::api_types::ApiReferenceItem;
use super::cache::ReferenceKind;
use super::client::HttpGateway;
use super::gateway::{fetch_collection, FetchGateway};
use super::types::{Asset, Department, Employee, ReferenceItem};

/// Console API client.
///
/// Categories, condition options and status options are cached with a
/// freshness window; assets, employees and departments are always fetched.
#[derive(Clone)]
pub struct CachedConsoleClient {
  gateway: Arc<dyn FetchGateway>,
  endpoints: Arc<Endpoints>,
  references: CacheStore<ReferenceKind, ReferenceItem>,
}

impl CachedConsoleClient {
  /// Create a client talking HTTP to the configured console API.
  pub fn new(config: &Config) -> Result<Self> {
    let gateway = HttpGateway::new(config)?;
    let options = CacheOptions::default().with_freshness(config.cache.freshness());

    Ok(Self::with_gateway(
      Arc::new(gateway),
      config.api.endpoints.clone(),
      options,
    ))
  }

  pub fn with_gateway(
    gateway: Arc<dyn FetchGateway>,
    endpoints: Endpoints,
    options: CacheOptions,
  ) -> Self {
    let endpoints = Arc::new(endpoints);

    let fetch_gateway = Arc::clone(&gateway);
    let fetch_endpoints = Arc::clone(&endpoints);
    let references = CacheStore::with_options(
      move |kind: ReferenceKind| {
        let path = kind.path(&fetch_endpoints);
        fetch_collection::<ApiReferenceItem>(fetch_gateway.as_ref(), path)
          .map(|result| result.map(|items| items.into_iter().map(ReferenceItem::from).collect()))
      },
      options,
    );

    Self {
      gateway,
      endpoints,
      references,
    }
  }

  pub async fn categories(&self) -> Snapshot<ReferenceItem> {
    self.references.get(ReferenceKind::Categories).await
  }

  pub async fn condition_options(&self) -> Snapshot<ReferenceItem> {
    self.references.get(ReferenceKind::ConditionOptions).await
  }

  pub async fn status_options(&self) -> Snapshot<ReferenceItem> {
    self.references.get(ReferenceKind::StatusOptions).await
  }

  /// Look up any reference collection.
  pub async fn references(&self, kind: ReferenceKind) -> Snapshot<ReferenceItem> {
    self.references.get(kind).await
  }

  /// Force a reload of `kind` (retry after an error).
  pub async fn refetch(&self, kind: ReferenceKind) -> Snapshot<ReferenceItem> {
    self.references.refetch(kind).await
  }

  pub fn subscribe(&self, kind: ReferenceKind) -> Subscription<ReferenceItem> {
    self.references.subscribe(kind)
  }

  pub fn peek(&self, kind: ReferenceKind) -> Snapshot<ReferenceItem> {
    self.references.peek(kind)
  }

  pub async fn assets(&self) -> Result<Vec<Asset>, FetchError> {
    fetch_collection(self.gateway.as_ref(), &self.endpoints.assets).await
  }

  pub async fn employees(&self) -> Result<Vec<Employee>, FetchError> {
    fetch_collection(self.gateway.as_ref(), &self.endpoints.employees).await
  }

  pub async fn departments(&self) -> Result<Vec<Department>, FetchError> {
    fetch_collection(self.gateway.as_ref(), &self.endpoints.departments).await
  }

  /// Load every dialog input concurrently. A source that fails to load is
  /// left out and shows up as missing in the composed bundle.
  pub async fn dialog_sources(&self) -> DialogSources {
    let (categories, status_options, condition_options, departments, employees) = tokio::join!(
      self.categories(),
      self.status_options(),
      self.condition_options(),
      self.departments(),
      self.employees(),
    );

    let mut sources =
      DialogSources::default().with_references(&categories, &status_options, &condition_options);

    match departments {
      Ok(departments) => sources = sources.with_locations(departments),
      Err(error) => warn!(%error, "departments unavailable for dialog"),
    }
    match employees {
      Ok(employees) => sources = sources.with_employees(employees),
      Err(error) => warn!(%error, "employees unavailable for dialog"),
    }

    sources
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::ManualClock;
  use crate::dialog::{compose, DialogSource};
  use color_eyre::eyre::eyre;
  use futures::future::{self, BoxFuture};
  use serde_json::{json, Value};
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::time::Duration;

  /// Gateway answering from a fixed path -> payload table.
  #[derive(Default)]
  struct FakeGateway {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
  }

  impl FakeGateway {
    fn with(mut self, path: &str, payload: Value) -> Self {
      self.responses.insert(path.to_string(), payload);
      self
    }

    fn calls(&self, path: &str) -> usize {
      self
        .calls
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.as_str() == path)
        .count()
    }
  }

  impl FetchGateway for FakeGateway {
    fn get_json(&self, path: &str) -> BoxFuture<'static, Result<Value, FetchError>> {
      self.calls.lock().unwrap().push(path.to_string());
      let result = self
        .responses
        .get(path)
        .cloned()
        .ok_or_else(|| FetchError::transport(eyre!("404 Not Found: {}", path)));
      future::ready(result).boxed()
    }
  }

  fn setup(gateway: FakeGateway, clock: &ManualClock) -> (CachedConsoleClient, Arc<FakeGateway>) {
    let gateway = Arc::new(gateway);
    let options = CacheOptions::default().with_clock(clock.clone());
    let client = CachedConsoleClient::with_gateway(gateway.clone(), Endpoints::default(), options);
    (client, gateway)
  }

  fn full_gateway() -> FakeGateway {
    FakeGateway::default()
      .with(
        "/api/categories",
        json!([{"id": 1, "label": "Laptop"}, {"id": 2, "name": "Monitor"}]),
      )
      .with("/api/asset-statuses", json!({"data": [{"id": "s1", "label": "In use"}]}))
      .with("/api/asset-conditions", json!([{"id": "c1", "label": "Good"}]))
      .with("/api/departments", json!([{"id": "d1", "name": "Eng"}]))
      .with(
        "/api/employees",
        json!([{"id": 7, "name": "Ana Silva", "department": "Eng"}]),
      )
      .with(
        "/api/assets",
        json!([{"id": 1, "assetCode": "LAP-001", "name": "ThinkPad", "department": null}]),
      )
  }

  #[tokio::test]
  async fn test_reference_lookups_are_cached() {
    let clock = ManualClock::new();
    let (client, gateway) = setup(full_gateway(), &clock);

    let first = client.categories().await;
    let second = client.categories().await;

    let labels: Vec<&str> = first.items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["Laptop", "Monitor"]);
    assert!(Arc::ptr_eq(&first.items, &second.items));
    assert_eq!(gateway.calls("/api/categories"), 1);

    clock.advance(Duration::from_secs(11 * 60));
    client.categories().await;
    assert_eq!(gateway.calls("/api/categories"), 2);
  }

  #[tokio::test]
  async fn test_envelope_payload_is_unwrapped() {
    let clock = ManualClock::new();
    let (client, _) = setup(full_gateway(), &clock);

    let statuses = client.status_options().await;

    assert!(statuses.is_ready());
    assert_eq!(statuses.items[0], ReferenceItem::new("s1", "In use"));
  }

  #[tokio::test]
  async fn test_failed_reference_reports_error_and_retries() {
    let clock = ManualClock::new();
    let (client, gateway) = setup(FakeGateway::default(), &clock);

    let snapshot = client.condition_options().await;
    assert!(snapshot.is_error());
    assert!(snapshot.items.is_empty());

    client.refetch(ReferenceKind::ConditionOptions).await;
    assert_eq!(gateway.calls("/api/asset-conditions"), 2);
  }

  #[tokio::test]
  async fn test_uncached_collections_hit_the_gateway_every_time() {
    let clock = ManualClock::new();
    let (client, gateway) = setup(full_gateway(), &clock);

    let assets = client.assets().await.unwrap();
    client.assets().await.unwrap();

    assert_eq!(assets[0].asset_code, "LAP-001");
    assert_eq!(assets[0].department, "");
    assert_eq!(gateway.calls("/api/assets"), 2);
  }

  #[tokio::test]
  async fn test_dialog_sources_mark_failures_missing() {
    let clock = ManualClock::new();
    let gateway = FakeGateway::default()
      .with("/api/categories", json!([{"id": 1, "label": "Laptop"}]))
      .with("/api/employees", json!([]));
    let (client, _) = setup(gateway, &clock);

    let data = compose(&client.dialog_sources().await);

    assert_eq!(data.categories.len(), 1);
    assert!(data.employees.is_empty());
    assert!(data.is_available(DialogSource::Employees));
    assert_eq!(
      data.missing,
      vec![
        DialogSource::Locations,
        DialogSource::StatusOptions,
        DialogSource::ConditionOptions,
      ]
    );
  }

  #[tokio::test]
  async fn test_complete_dialog_bundle() {
    let clock = ManualClock::new();
    let (client, _) = setup(full_gateway(), &clock);

    let data = compose(&client.dialog_sources().await);

    assert!(data.is_complete());
    assert_eq!(data.employee("7").map(|e| e.name.as_str()), Some("Ana Silva"));
  }
}
