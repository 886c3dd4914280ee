//! Keyed read-through store that orchestrates freshness, de-duplication and
//! fetch ordering on top of an injected fetch function.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use color_eyre::eyre::eyre;
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::traits::{CacheKey, EntryState, FetchError, Snapshot};
use crate::query::Subscription;

/// How long a successful fetch is served without refetching.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(10 * 60);

/// Boxed fetch function: one call per issued fetch.
pub type Fetcher<K, T> =
  Arc<dyn Fn(K) -> BoxFuture<'static, Result<Vec<T>, FetchError>> + Send + Sync>;

/// Tunables for a [`CacheStore`].
#[derive(Clone)]
pub struct CacheOptions {
  freshness: Duration,
  clock: Arc<dyn Clock>,
}

impl CacheOptions {
  /// Set how long fetched data stays fresh.
  pub fn with_freshness(mut self, freshness: Duration) -> Self {
    self.freshness = freshness;
    self
  }

  /// Replace the time source (tests use a manual clock).
  pub fn with_clock(mut self, clock: impl Clock) -> Self {
    self.clock = Arc::new(clock);
    self
  }
}

impl Default for CacheOptions {
  fn default() -> Self {
    Self {
      freshness: DEFAULT_FRESHNESS,
      clock: Arc::new(SystemClock),
    }
  }
}

/// Read-through cache of collections keyed by `K`.
///
/// Policy per key:
/// 1. Fresh `Ready` entry: served without a fetch
/// 2. Fetch already in flight: the caller joins it
/// 3. Otherwise (idle, expired, or last fetch failed): a new fetch is issued
///
/// Every issued fetch gets the next generation number for its key. Only the
/// most recently issued generation may write to the entry, so a slow response
/// that was superseded by a later fetch is dropped on arrival.
///
/// Fetches run as spawned tasks, so methods that issue one must be called
/// from within a tokio runtime.
pub struct CacheStore<K: CacheKey, T> {
  inner: Arc<Inner<K, T>>,
}

struct Inner<K, T> {
  entries: Mutex<HashMap<K, Entry<T>>>,
  fetcher: Fetcher<K, T>,
  freshness: Duration,
  clock: Arc<dyn Clock>,
}

struct Entry<T> {
  items: Arc<Vec<T>>,
  fetched_at: Option<Instant>,
  state: EntryState,
  error: Option<FetchError>,
  /// Generation of the most recently issued fetch
  issued: u64,
  /// Generation of the most recently settled fetch
  settled: u64,
  tx: watch::Sender<Snapshot<T>>,
}

enum Plan {
  Fresh,
  Join(u64),
  Issue,
}

enum Applied {
  Stored,
  Failed,
  /// Response from a superseded fetch; never surfaced to callers
  StaleRead,
}

impl<K: CacheKey, T: Send + Sync + 'static> CacheStore<K, T> {
  /// Create a store with default options.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send + 'static,
  {
    Self::with_options(fetcher, CacheOptions::default())
  }

  pub fn with_options<F, Fut>(fetcher: F, options: CacheOptions) -> Self
  where
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send + 'static,
  {
    Self {
      inner: Arc::new(Inner {
        entries: Mutex::new(HashMap::new()),
        fetcher: Arc::new(move |key| fetcher(key).boxed()),
        freshness: options.freshness,
        clock: options.clock,
      }),
    }
  }

  pub fn freshness(&self) -> Duration {
    self.inner.freshness
  }

  /// Look up `key`, fetching if the entry is missing, expired or failed.
  ///
  /// Never fails: a fetch error is reported in the snapshot's `error` field
  /// next to the best available items.
  pub async fn get(&self, key: K) -> Snapshot<T> {
    let (target, rx) = {
      let mut entries = self.inner.lock();
      let entry = entries.entry(key).or_insert_with(Entry::new);
      let target = match self.inner.plan(entry) {
        Plan::Fresh => return entry.snapshot(),
        Plan::Join(generation) => {
          debug!(key = key.describe(), generation, "joining in-flight fetch");
          generation
        }
        Plan::Issue => Inner::issue(&self.inner, key, entry),
      };
      (target, entry.tx.subscribe())
    };

    wait_settled(rx, target).await
  }

  /// Issue a new fetch for `key` regardless of freshness and wait for it.
  ///
  /// A fetch already in flight is superseded; its response will be dropped.
  pub async fn refetch(&self, key: K) -> Snapshot<T> {
    let (target, rx) = {
      let mut entries = self.inner.lock();
      let entry = entries.entry(key).or_insert_with(Entry::new);
      let target = Inner::issue(&self.inner, key, entry);
      (target, entry.tx.subscribe())
    };

    wait_settled(rx, target).await
  }

  /// Start a fetch for `key` if one is needed, without waiting for it.
  pub fn prefetch(&self, key: K) {
    let mut entries = self.inner.lock();
    let entry = entries.entry(key).or_insert_with(Entry::new);
    if let Plan::Issue = self.inner.plan(entry) {
      Inner::issue(&self.inner, key, entry);
    }
  }

  /// Current snapshot for `key` without triggering a fetch.
  pub fn peek(&self, key: K) -> Snapshot<T> {
    self
      .inner
      .lock()
      .get(&key)
      .map(Entry::snapshot)
      .unwrap_or_else(Snapshot::empty)
  }

  /// Watch `key` for changes. Starts a fetch if one is needed.
  ///
  /// Dropping the subscription only stops notifications; a fetch it started
  /// still populates the cache.
  pub fn subscribe(&self, key: K) -> Subscription<T> {
    let mut entries = self.inner.lock();
    let entry = entries.entry(key).or_insert_with(Entry::new);
    if let Plan::Issue = self.inner.plan(entry) {
      Inner::issue(&self.inner, key, entry);
    }
    Subscription::new(entry.tx.subscribe())
  }
}

impl<K: CacheKey, T: Send + Sync + 'static> Inner<K, T> {
  fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<T>>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn plan(&self, entry: &Entry<T>) -> Plan {
    match entry.state {
      EntryState::Loading => Plan::Join(entry.issued),
      EntryState::Ready if self.is_fresh(entry) => Plan::Fresh,
      _ => Plan::Issue,
    }
  }

  fn is_fresh(&self, entry: &Entry<T>) -> bool {
    entry
      .fetched_at
      .map(|at| self.clock.now().saturating_duration_since(at) < self.freshness)
      .unwrap_or(false)
  }

  /// Mark the entry loading and spawn the fetch. Returns its generation.
  fn issue(this: &Arc<Self>, key: K, entry: &mut Entry<T>) -> u64 {
    entry.issued += 1;
    let generation = entry.issued;
    entry.state = EntryState::Loading;
    entry.publish();
    debug!(key = key.describe(), generation, "issuing fetch");

    let fetch = (this.fetcher)(key);
    let inner = Arc::clone(this);
    tokio::spawn(async move {
      // A panicking fetch still has to settle its generation
      let result = AssertUnwindSafe(fetch)
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(FetchError::transport(eyre!("fetch task panicked"))));
      inner.resolve(key, generation, result);
    });

    generation
  }

  fn resolve(&self, key: K, generation: u64, result: Result<Vec<T>, FetchError>) {
    let now = self.clock.now();
    let mut entries = self.lock();
    let Some(entry) = entries.get_mut(&key) else {
      return;
    };

    match entry.apply(generation, result, now) {
      Applied::Stored => debug!(
        key = key.describe(),
        generation,
        count = entry.items.len(),
        "fetch applied"
      ),
      Applied::Failed => {
        if let Some(error) = &entry.error {
          warn!(
            key = key.describe(),
            generation,
            %error,
            "fetch failed, keeping last known items"
          );
        }
      }
      Applied::StaleRead => debug!(
        key = key.describe(),
        generation,
        latest = entry.issued,
        "discarding superseded response"
      ),
    }
  }
}

impl<T> Entry<T> {
  fn new() -> Self {
    let (tx, _) = watch::channel(Snapshot::empty());
    Self {
      items: Arc::new(Vec::new()),
      fetched_at: None,
      state: EntryState::Idle,
      error: None,
      issued: 0,
      settled: 0,
      tx,
    }
  }

  fn apply(
    &mut self,
    generation: u64,
    result: Result<Vec<T>, FetchError>,
    now: Instant,
  ) -> Applied {
    if generation != self.issued {
      return Applied::StaleRead;
    }

    self.settled = generation;
    let applied = match result {
      Ok(items) => {
        self.items = Arc::new(items);
        self.fetched_at = Some(now);
        self.state = EntryState::Ready;
        self.error = None;
        Applied::Stored
      }
      Err(error) => {
        // fetched_at is left alone: the entry is not Ready, so it is not fresh
        self.state = EntryState::Error;
        self.error = Some(error);
        Applied::Failed
      }
    };
    self.publish();
    applied
  }

  fn snapshot(&self) -> Snapshot<T> {
    Snapshot {
      items: Arc::clone(&self.items),
      state: self.state,
      error: self.error.clone(),
      fetched_at: self.fetched_at,
      settled: self.settled,
    }
  }

  fn publish(&self) {
    self.tx.send_replace(self.snapshot());
  }
}

/// Wait until generation `target` (or a later one) has settled.
async fn wait_settled<T>(mut rx: watch::Receiver<Snapshot<T>>, target: u64) -> Snapshot<T> {
  let settled = rx
    .wait_for(|snapshot| snapshot.settled >= target)
    .await
    .map(|snapshot| snapshot.clone());

  // The sender lives as long as the entry, so this only covers teardown.
  settled.unwrap_or_else(|_| rx.borrow().clone())
}

impl<K: CacheKey, T> Clone for CacheStore<K, T> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}
