//! Editable form state of the create/detail dialogs.

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use super::compose::{DialogData, DialogSource};
use crate::api::types::{Asset, ReferenceItem};

/// Versioned read-modify-write cell.
///
/// `read` hands out an immutable snapshot; `update` applies a change to a
/// copy, so snapshots already handed out never change.
#[derive(Debug, Clone, Default)]
pub struct FormState<T> {
  value: Arc<T>,
  version: u64,
}

impl<T: Clone> FormState<T> {
  pub fn new(value: T) -> Self {
    Self {
      value: Arc::new(value),
      version: 0,
    }
  }

  pub fn read(&self) -> Arc<T> {
    Arc::clone(&self.value)
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  pub fn update(&mut self, f: impl FnOnce(&mut T)) {
    f(Arc::make_mut(&mut self.value));
    self.version += 1;
  }

  pub fn replace(&mut self, value: T) {
    self.value = Arc::new(value);
    self.version += 1;
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
  #[error("{0} is required")]
  Missing(&'static str),

  #[error("unknown {kind}: {id}")]
  UnknownOption { kind: DialogSource, id: String },

  #[error("value must not be negative")]
  NegativeValue,
}

/// Fields edited in the asset dialog. Reference fields hold option ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetDraft {
  pub asset_code: String,
  pub name: String,
  pub category_id: Option<String>,
  pub status_id: Option<String>,
  pub condition_id: Option<String>,
  pub department_id: Option<String>,
  pub assignee_id: Option<String>,
  pub value: Option<f64>,
  pub purchase_date: Option<NaiveDate>,
  pub description: Option<String>,
  pub tags: Vec<String>,
}

fn id_for_label(items: &[ReferenceItem], label: &str) -> Option<String> {
  if label.is_empty() {
    return None;
  }
  items
    .iter()
    .find(|item| item.label == label)
    .map(|item| item.id.clone())
    .or_else(|| Some(label.to_string()))
}

impl AssetDraft {
  /// Seed the detail dialog from an existing record. Labels are resolved to
  /// option ids where the bundle knows them and kept verbatim otherwise.
  pub fn from_asset(asset: &Asset, data: &DialogData) -> Self {
    let department_id = (!asset.department.is_empty()).then(|| {
      data
        .locations
        .iter()
        .find(|d| d.name == asset.department)
        .map_or_else(|| asset.department.clone(), |d| d.id.clone())
    });
    let assignee_id = asset.assignee.as_ref().map(|assignee| {
      data
        .employees
        .iter()
        .find(|e| &e.name == assignee)
        .map_or_else(|| assignee.clone(), |e| e.id.clone())
    });

    Self {
      asset_code: asset.asset_code.clone(),
      name: asset.name.clone(),
      category_id: id_for_label(&data.categories, &asset.category),
      status_id: id_for_label(&data.status_options, &asset.status),
      condition_id: id_for_label(&data.condition_options, &asset.condition),
      department_id,
      assignee_id,
      value: asset.value,
      purchase_date: asset.purchase_date,
      description: asset.description.clone(),
      tags: asset.tags.clone(),
    }
  }

  /// Check required fields and that chosen options exist in `data`.
  ///
  /// Options are only checked against sources that are available; a source
  /// still loading cannot reject a choice.
  pub fn validate(&self, data: &DialogData) -> Result<(), Vec<DraftError>> {
    let mut errors = Vec::new();

    if self.asset_code.trim().is_empty() {
      errors.push(DraftError::Missing("asset code"));
    }
    if self.name.trim().is_empty() {
      errors.push(DraftError::Missing("name"));
    }
    if self.value.is_some_and(|value| value < 0.0) {
      errors.push(DraftError::NegativeValue);
    }

    let choices = [
      (DialogSource::Categories, &self.category_id),
      (DialogSource::StatusOptions, &self.status_id),
      (DialogSource::ConditionOptions, &self.condition_id),
      (DialogSource::Locations, &self.department_id),
      (DialogSource::Employees, &self.assignee_id),
    ];
    for (kind, id) in choices {
      let Some(id) = id else { continue };
      if data.is_available(kind) && !data.has_option(kind, id) {
        errors.push(DraftError::UnknownOption {
          kind,
          id: id.clone(),
        });
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }
}
