//! Live view of one cache entry for UI consumers.
//!
//! A `Subscription<T>` holds the latest snapshot of a cache key and a
//! notification channel that fires whenever the entry changes (fetch issued,
//! applied, or failed). The rendering layer decides how to react.
//!
//! # Example
//!
//! ```ignore
//! let mut categories = client.subscribe(ReferenceKind::Categories);
//!
//! // In event loop tick
//! if categories.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! if categories.is_loading() {
//!     render_spinner();
//! }
//! render_list(categories.items());
//! if let Some(error) = categories.error() {
//!     render_inline_error(error);
//! }
//! ```
//!
//! Dropping the subscription unsubscribes. Fetches already started keep
//! running and still populate the cache.

use tokio::sync::watch;

use crate::cache::{EntryState, FetchError, Snapshot};

pub struct Subscription<T> {
  receiver: watch::Receiver<Snapshot<T>>,
  current: Snapshot<T>,
}

impl<T> Subscription<T> {
  pub(crate) fn new(mut receiver: watch::Receiver<Snapshot<T>>) -> Self {
    let current = receiver.borrow_and_update().clone();
    Self { receiver, current }
  }

  /// The latest snapshot seen by this subscription.
  pub fn snapshot(&self) -> &Snapshot<T> {
    &self.current
  }

  pub fn items(&self) -> &[T] {
    self.current.items.as_slice()
  }

  pub fn state(&self) -> EntryState {
    self.current.state
  }

  pub fn is_loading(&self) -> bool {
    self.current.is_loading()
  }

  pub fn is_ready(&self) -> bool {
    self.current.is_ready()
  }

  pub fn is_error(&self) -> bool {
    self.current.is_error()
  }

  pub fn error(&self) -> Option<&FetchError> {
    self.current.error.as_ref()
  }

  /// Pick up a pending change without blocking.
  ///
  /// Returns `true` if the snapshot changed since the last poll.
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    match self.receiver.has_changed() {
      Ok(true) => {
        self.current = self.receiver.borrow_and_update().clone();
        true
      }
      Ok(false) | Err(_) => false,
    }
  }

  /// Wait for the next change.
  ///
  /// Returns `false` if the store was dropped and no change can follow.
  pub async fn changed(&mut self) -> bool {
    if self.receiver.changed().await.is_err() {
      return false;
    }
    self.current = self.receiver.borrow_and_update().clone();
    true
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Subscription<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("current", &self.current)
      .finish_non_exhaustive()
  }
}
