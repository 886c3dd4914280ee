//! Core traits and types for the caching system.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use color_eyre::Report;
use thiserror::Error;

/// Trait for keys that identify one cached collection.
///
/// Each key owns an independent entry with its own freshness window,
/// in-flight fetch and generation counter.
pub trait CacheKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {
  /// Short name used in log output (e.g., "categories")
  fn describe(&self) -> &'static str;
}

/// Lifecycle state of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
  /// No fetch has been issued yet
  #[default]
  Idle,
  /// A fetch is in flight
  Loading,
  /// The last fetch succeeded
  Ready,
  /// The last fetch failed
  Error,
}

/// Failure reported by the remote fetch gateway.
///
/// Cloneable so one failure can be handed to every caller that joined the
/// same in-flight request.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
  /// Network or transport failure; the original cause is kept opaque
  #[error("{0}")]
  Transport(Arc<Report>),
  /// The payload arrived but did not match the expected shape
  #[error("failed to decode {what}: {message}")]
  Decode { what: String, message: String },
}

impl FetchError {
  pub fn transport(err: impl Into<Report>) -> Self {
    Self::Transport(Arc::new(err.into()))
  }

  pub fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
    Self::Decode {
      what: what.into(),
      message: err.to_string(),
    }
  }
}

/// Point-in-time view of one cache entry, as handed to consumers.
///
/// `items` is never absent: before the first successful fetch it is an empty
/// collection, and after a failed refetch it still holds the last good value.
#[derive(Debug)]
pub struct Snapshot<T> {
  /// Best available items (possibly stale or empty)
  pub items: Arc<Vec<T>>,
  /// Entry state at the time of the snapshot
  pub state: EntryState,
  /// Error from the most recent fetch, if it failed
  pub error: Option<FetchError>,
  /// When the items were last fetched successfully
  pub fetched_at: Option<Instant>,
  /// Highest fetch generation that has settled into this entry
  pub(crate) settled: u64,
}

impl<T> Snapshot<T> {
  pub fn empty() -> Self {
    Self {
      items: Arc::new(Vec::new()),
      state: EntryState::Idle,
      error: None,
      fetched_at: None,
      settled: 0,
    }
  }

  pub fn is_loading(&self) -> bool {
    self.state == EntryState::Loading
  }

  pub fn is_ready(&self) -> bool {
    self.state == EntryState::Ready
  }

  pub fn is_error(&self) -> bool {
    self.state == EntryState::Error
  }

  /// Whether at least one fetch has ever succeeded for this entry.
  pub fn has_loaded(&self) -> bool {
    self.fetched_at.is_some()
  }
}

// Manual impl: `Arc<Vec<T>>` is cloneable without `T: Clone`.
impl<T> Clone for Snapshot<T> {
  fn clone(&self) -> Self {
    Self {
      items: Arc::clone(&self.items),
      state: self.state,
      error: self.error.clone(),
      fetched_at: self.fetched_at,
      settled: self.settled,
    }
  }
}
