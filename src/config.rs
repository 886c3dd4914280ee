use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the console API (e.g., "https://assets.example.com")
  pub url: String,
  /// Request timeout applied by the HTTP gateway
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  #[serde(default)]
  pub endpoints: Endpoints,
}

fn default_timeout_secs() -> u64 {
  30
}

/// Paths of the collection endpoints, relative to the API base URL.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
  pub categories: String,
  pub condition_options: String,
  pub status_options: String,
  pub assets: String,
  pub employees: String,
  pub departments: String,
}

impl Default for Endpoints {
  fn default() -> Self {
    Self {
      categories: "/api/categories".to_string(),
      condition_options: "/api/asset-conditions".to_string(),
      status_options: "/api/asset-statuses".to_string(),
      assets: "/api/assets".to_string(),
      employees: "/api/employees".to_string(),
      departments: "/api/departments".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Minutes a fetched reference collection is served without refetching
  #[serde(default = "default_freshness_minutes")]
  pub freshness_minutes: u64,
}

fn default_freshness_minutes() -> u64 {
  10
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      freshness_minutes: default_freshness_minutes(),
    }
  }
}

impl CacheConfig {
  pub fn freshness(&self) -> Duration {
    Duration::from_secs(self.freshness_minutes.saturating_mul(60))
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./assetdesk.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/assetdesk/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/assetdesk/config.yaml\n\
                 with at least `api: {{ url: <console API base URL> }}`."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("assetdesk.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("assetdesk").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.cache.freshness_minutes == 0 {
      return Err(eyre!("cache.freshness_minutes must be greater than 0"));
    }
    Ok(config)
  }

  /// Get the API token from the environment.
  ///
  /// Reads ASSETDESK_API_TOKEN. Requests go out unauthenticated when unset.
  pub fn get_api_token() -> Option<String> {
    std::env::var("ASSETDESK_API_TOKEN")
      .ok()
      .filter(|token| !token.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minimal_config_uses_defaults() {
    let config = Config::from_yaml("api:\n  url: https://assets.example.com\n").unwrap();

    assert_eq!(config.api.url, "https://assets.example.com");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.api.endpoints, Endpoints::default());
    assert_eq!(config.cache.freshness(), Duration::from_secs(600));
  }

  #[test]
  fn test_partial_endpoint_override() {
    let yaml = r#"
api:
  url: https://assets.example.com
  endpoints:
    categories: /v2/categories
cache:
  freshness_minutes: 2
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.api.endpoints.categories, "/v2/categories");
    assert_eq!(config.api.endpoints.assets, "/api/assets");
    assert_eq!(config.cache.freshness(), Duration::from_secs(120));
  }

  #[test]
  fn test_zero_freshness_is_rejected() {
    let yaml = "api:\n  url: https://a.example\ncache:\n  freshness_minutes: 0\n";

    assert!(Config::from_yaml(yaml).is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    let err = Config::load(Some(Path::new("/nonexistent/assetdesk.yaml"))).unwrap_err();

    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_huge_freshness_saturates() {
    let yaml = format!(
      "api:\n  url: https://a.example\ncache:\n  freshness_minutes: {}\n",
      u64::MAX
    );
    let config = Config::from_yaml(&yaml).unwrap();

    assert_eq!(config.cache.freshness(), Duration::from_secs(u64::MAX));
  }
}
