//! Scripted fetch function for driving cache tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::eyre;

use super::traits::{CacheKey, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TestKey {
  Colors,
  Sizes,
}

impl CacheKey for TestKey {
  fn describe(&self) -> &'static str {
    match self {
      Self::Colors => "colors",
      Self::Sizes => "sizes",
    }
  }
}

struct Scripted<T> {
  delay: Duration,
  result: Result<Vec<T>, FetchError>,
}

/// Hands out queued responses in call order. An empty queue answers with an
/// empty collection.
pub(crate) struct ScriptedFetcher<T> {
  responses: Mutex<VecDeque<Scripted<T>>>,
  calls: AtomicUsize,
}

impl<T: Send + 'static> ScriptedFetcher<T> {
  pub fn new() -> Arc<Self> {
    Arc::new(Self {
      responses: Mutex::new(VecDeque::new()),
      calls: AtomicUsize::new(0),
    })
  }

  pub fn push_ok(&self, items: Vec<T>) {
    self.push(Duration::ZERO, Ok(items));
  }

  pub fn push_ok_after(&self, delay: Duration, items: Vec<T>) {
    self.push(delay, Ok(items));
  }

  pub fn push_err(&self, message: &'static str) {
    self.push(Duration::ZERO, Err(FetchError::transport(eyre!(message))));
  }

  fn push(&self, delay: Duration, result: Result<Vec<T>, FetchError>) {
    self
      .responses
      .lock()
      .unwrap()
      .push_back(Scripted { delay, result });
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  /// Take the next response now; deliver it after its delay.
  pub fn fetch(&self) -> impl Future<Output = Result<Vec<T>, FetchError>> + Send + 'static {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let next = self.responses.lock().unwrap().pop_front();
    async move {
      match next {
        Some(Scripted { delay, result }) => {
          if !delay.is_zero() {
            tokio::time::sleep(delay).await;
          }
          result
        }
        None => Ok(Vec::new()),
      }
    }
  }
}
