use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::api_types::{de_id, string_or_null};

/// Entry of a reference collection (category, condition option, status option).
///
/// Replaced wholesale on refetch, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
  pub id: String,
  pub label: String,
  /// Any other fields the server sent along
  #[serde(default)]
  pub metadata: BTreeMap<String, Value>,
}

impl ReferenceItem {
  pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      label: label.into(),
      metadata: BTreeMap::new(),
    }
  }
}

/// Asset record as listed in the console
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  #[serde(deserialize_with = "de_id")]
  pub id: String,
  #[serde(alias = "code")]
  pub asset_code: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, deserialize_with = "string_or_null")]
  pub category: String,
  #[serde(default, deserialize_with = "string_or_null")]
  pub status: String,
  #[serde(default, deserialize_with = "string_or_null")]
  pub condition: String,
  #[serde(default, deserialize_with = "string_or_null")]
  pub department: String,
  #[serde(default)]
  pub assignee: Option<String>,
  #[serde(default)]
  pub value: Option<f64>,
  #[serde(default)]
  pub purchase_date: Option<NaiveDate>,
  #[serde(default)]
  pub warranty_expiry: Option<NaiveDate>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub serial_number: Option<String>,
  #[serde(default)]
  pub manufacturer: Option<String>,
  #[serde(default)]
  pub model: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub created_by: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  #[serde(deserialize_with = "de_id")]
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub position: Option<String>,
  /// Department name; empty when the server sent none
  #[serde(default, deserialize_with = "string_or_null")]
  pub department: String,
  #[serde(default)]
  pub email: Option<String>,
}

/// Department, offered as a location in asset dialogs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
  #[serde(deserialize_with = "de_id")]
  pub id: String,
  pub name: String,
}
