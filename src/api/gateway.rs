//! Seam between the data layer and the network.

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

use super::api_types::decode_collection;
use crate::cache::FetchError;

/// Performs the remote calls the data layer depends on.
///
/// Implementations own transport concerns (base URL, auth, timeouts).
/// The returned future must not borrow the gateway so it can run as its own
/// task.
pub trait FetchGateway: Send + Sync + 'static {
  /// GET `path` and return the JSON body.
  fn get_json(&self, path: &str) -> BoxFuture<'static, Result<Value, FetchError>>;
}

/// Fetch `path` and decode it as a collection of `T`.
pub fn fetch_collection<T>(
  gateway: &dyn FetchGateway,
  path: &str,
) -> impl Future<Output = Result<Vec<T>, FetchError>> + Send + 'static
where
  T: DeserializeOwned + Send + 'static,
{
  let request = gateway.get_json(path);
  let what = path.to_string();
  async move {
    let payload = request.await?;
    decode_collection(&what, payload)
  }
}
