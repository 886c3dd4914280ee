use crate::api::gateway::FetchGateway;
use crate::cache::FetchError;
use crate::config::Config;
use color_eyre::{eyre::eyre, Result};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Parse the API base URL so that endpoint paths resolve beneath it.
///
/// A trailing `/` is added when missing, otherwise `join` would replace the
/// last path segment.
fn parse_base_url(raw: &str) -> Result<Url> {
  let mut url = Url::parse(raw).map_err(|e| eyre!("Invalid API url {}: {}", raw, e))?;
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

/// Resolve an endpoint path relative to the base URL, keeping any path prefix
/// of the base (e.g. "https://host/console/" + "/api/assets").
fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
  base.join(path.trim_start_matches('/'))
}

/// HTTP gateway to the console API
#[derive(Clone)]
pub struct HttpGateway {
  client: reqwest::Client,
  base_url: Url,
  token: Option<String>,
}

impl HttpGateway {
  pub fn new(config: &Config) -> Result<Self> {
    let base_url = parse_base_url(&config.api.url)?;

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.api.timeout_secs))
      .gzip(true)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      base_url,
      token: Config::get_api_token(),
    })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }
}

impl FetchGateway for HttpGateway {
  fn get_json(&self, path: &str) -> BoxFuture<'static, Result<Value, FetchError>> {
    let url = match endpoint_url(&self.base_url, path) {
      Ok(url) => url,
      Err(e) => {
        let err = FetchError::transport(eyre!("Invalid endpoint path {}: {}", path, e));
        return future::ready(Err(err)).boxed();
      }
    };

    let mut request = self.client.get(url.clone());
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }

    async move {
      debug!(%url, "GET");
      let response = request
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(FetchError::transport)?;

      response
        .json::<Value>()
        .await
        .map_err(|e| FetchError::decode(url.path(), e))
    }
    .boxed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_keeps_base_path_prefix() {
    let base = parse_base_url("https://host.example/console/").unwrap();

    let url = endpoint_url(&base, "/api/categories").unwrap();

    assert_eq!(url.as_str(), "https://host.example/console/api/categories");
  }

  #[test]
  fn test_base_without_trailing_slash() {
    let base = parse_base_url("https://host.example/console").unwrap();

    let url = endpoint_url(&base, "api/assets").unwrap();

    assert_eq!(url.as_str(), "https://host.example/console/api/assets");
  }

  #[test]
  fn test_bare_origin() {
    let base = parse_base_url("https://host.example").unwrap();

    let url = endpoint_url(&base, "/api/assets").unwrap();

    assert_eq!(url.as_str(), "https://host.example/api/assets");
  }

  #[test]
  fn test_invalid_base_url_is_error() {
    assert!(parse_base_url("not a url").is_err());
  }
}
