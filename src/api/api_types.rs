//! Serde-deserializable types matching the console API's wire format.
//!
//! These types are separate from domain types to allow lenient
//! deserialization while keeping domain types focused on application needs.

use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::types::ReferenceItem;
use crate::cache::FetchError;

// ============================================================================
// Field helpers
// ============================================================================

/// Accept identifiers sent either as strings or as numbers.
pub fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    other => Err(de::Error::custom(format!(
      "expected string or number id, got {}",
      other
    ))),
  }
}

/// Treat `null` the same as a missing string.
pub fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Collection envelope
// ============================================================================

/// Collection endpoints answer with either a bare array or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiCollection<T> {
  Bare(Vec<T>),
  Envelope { data: Vec<T> },
}

impl<T> ApiCollection<T> {
  pub fn into_items(self) -> Vec<T> {
    match self {
      Self::Bare(items) | Self::Envelope { data: items } => items,
    }
  }
}

/// Decode a collection payload fetched from `what`.
pub fn decode_collection<T: DeserializeOwned>(
  what: &str,
  payload: Value,
) -> Result<Vec<T>, FetchError> {
  serde_json::from_value::<ApiCollection<T>>(payload)
    .map(ApiCollection::into_items)
    .map_err(|e| FetchError::decode(what, e))
}

// ============================================================================
// Reference items
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiReferenceItem {
  #[serde(deserialize_with = "de_id")]
  pub id: String,
  pub label: Option<String>,
  pub name: Option<String>,
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

impl From<ApiReferenceItem> for ReferenceItem {
  fn from(item: ApiReferenceItem) -> Self {
    // Some endpoints only send `name`; fall back to the id as a last resort
    let label = item
      .label
      .or_else(|| item.name.clone())
      .unwrap_or_else(|| item.id.clone());

    let mut metadata = item.extra;
    if let Some(name) = item.name {
      if name != label {
        metadata.insert("name".to_string(), Value::String(name));
      }
    }

    Self {
      id: item.id,
      label,
      metadata,
    }
  }
}
