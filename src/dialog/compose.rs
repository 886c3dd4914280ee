//! Assembly of the read-only data bundle behind the asset dialogs.

use std::fmt;
use std::sync::Arc;

use crate::api::types::{Department, Employee, ReferenceItem};
use crate::cache::Snapshot;

/// One input collection of the dialog bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogSource {
  Categories,
  Locations,
  Employees,
  StatusOptions,
  ConditionOptions,
}

impl fmt::Display for DialogSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Categories => "categories",
      Self::Locations => "locations",
      Self::Employees => "employees",
      Self::StatusOptions => "status options",
      Self::ConditionOptions => "condition options",
    };
    f.pad(name)
  }
}

/// Current snapshots of the dialog inputs; `None` means not loaded yet.
#[derive(Debug, Clone, Default)]
pub struct DialogSources {
  pub categories: Option<Arc<Vec<ReferenceItem>>>,
  pub locations: Option<Arc<Vec<Department>>>,
  pub employees: Option<Arc<Vec<Employee>>>,
  pub status_options: Option<Arc<Vec<ReferenceItem>>>,
  pub condition_options: Option<Arc<Vec<ReferenceItem>>>,
}

fn loaded(snapshot: &Snapshot<ReferenceItem>) -> Option<Arc<Vec<ReferenceItem>>> {
  snapshot.has_loaded().then(|| Arc::clone(&snapshot.items))
}

impl DialogSources {
  /// Take the reference collections from cache snapshots. A snapshot that has
  /// never loaded counts as not available.
  pub fn with_references(
    mut self,
    categories: &Snapshot<ReferenceItem>,
    status_options: &Snapshot<ReferenceItem>,
    condition_options: &Snapshot<ReferenceItem>,
  ) -> Self {
    self.categories = loaded(categories);
    self.status_options = loaded(status_options);
    self.condition_options = loaded(condition_options);
    self
  }

  pub fn with_locations(mut self, locations: Vec<Department>) -> Self {
    self.locations = Some(Arc::new(locations));
    self
  }

  pub fn with_employees(mut self, employees: Vec<Employee>) -> Self {
    self.employees = Some(Arc::new(employees));
    self
  }
}

/// Immutable composite snapshot handed to the create/detail dialogs.
///
/// Every collection is either fully loaded or empty with its source listed in
/// `missing`.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogData {
  pub categories: Arc<Vec<ReferenceItem>>,
  pub locations: Arc<Vec<Department>>,
  pub employees: Arc<Vec<Employee>>,
  pub status_options: Arc<Vec<ReferenceItem>>,
  pub condition_options: Arc<Vec<ReferenceItem>>,
  pub missing: Vec<DialogSource>,
}

impl DialogData {
  pub fn is_available(&self, source: DialogSource) -> bool {
    !self.missing.contains(&source)
  }

  pub fn is_complete(&self) -> bool {
    self.missing.is_empty()
  }

  pub fn category(&self, id: &str) -> Option<&ReferenceItem> {
    self.categories.iter().find(|item| item.id == id)
  }

  pub fn status_option(&self, id: &str) -> Option<&ReferenceItem> {
    self.status_options.iter().find(|item| item.id == id)
  }

  pub fn condition_option(&self, id: &str) -> Option<&ReferenceItem> {
    self.condition_options.iter().find(|item| item.id == id)
  }

  pub fn location(&self, id: &str) -> Option<&Department> {
    self.locations.iter().find(|department| department.id == id)
  }

  pub fn employee(&self, id: &str) -> Option<&Employee> {
    self.employees.iter().find(|employee| employee.id == id)
  }

  /// Whether `id` is one of the options offered by `source`.
  pub fn has_option(&self, source: DialogSource, id: &str) -> bool {
    match source {
      DialogSource::Categories => self.category(id).is_some(),
      DialogSource::Locations => self.location(id).is_some(),
      DialogSource::Employees => self.employee(id).is_some(),
      DialogSource::StatusOptions => self.status_option(id).is_some(),
      DialogSource::ConditionOptions => self.condition_option(id).is_some(),
    }
  }
}

fn take<T>(
  source: &Option<Arc<Vec<T>>>,
  kind: DialogSource,
  missing: &mut Vec<DialogSource>,
) -> Arc<Vec<T>> {
  match source {
    Some(items) => Arc::clone(items),
    None => {
      missing.push(kind);
      Arc::new(Vec::new())
    }
  }
}

/// Build a bundle from the current sources. Never fetches.
pub fn compose(sources: &DialogSources) -> DialogData {
  let mut missing = Vec::new();
  DialogData {
    categories: take(&sources.categories, DialogSource::Categories, &mut missing),
    locations: take(&sources.locations, DialogSource::Locations, &mut missing),
    employees: take(&sources.employees, DialogSource::Employees, &mut missing),
    status_options: take(&sources.status_options, DialogSource::StatusOptions, &mut missing),
    condition_options: take(
      &sources.condition_options,
      DialogSource::ConditionOptions,
      &mut missing,
    ),
    missing,
  }
}

/// Holds the bundle of the open dialog, if any.
///
/// Recomposition produces a new bundle only when a source changed, and keeps
/// the identity of every collection that did not.
#[derive(Debug, Default)]
pub struct DialogComposer {
  current: Option<Arc<DialogData>>,
}

fn reuse<T>(previous: &Arc<Vec<T>>, next: Arc<Vec<T>>) -> Arc<Vec<T>> {
  if Arc::ptr_eq(previous, &next) || (previous.is_empty() && next.is_empty()) {
    Arc::clone(previous)
  } else {
    next
  }
}

impl DialogComposer {
  pub fn new() -> Self {
    Self::default()
  }

  /// The bundle of the open dialog; `None` before the first composition and
  /// after `clear`.
  pub fn current(&self) -> Option<Arc<DialogData>> {
    self.current.clone()
  }

  pub fn recompose(&mut self, sources: &DialogSources) -> Arc<DialogData> {
    let next = compose(sources);

    let bundle = match &self.current {
      Some(previous) => {
        let merged = DialogData {
          categories: reuse(&previous.categories, next.categories),
          locations: reuse(&previous.locations, next.locations),
          employees: reuse(&previous.employees, next.employees),
          status_options: reuse(&previous.status_options, next.status_options),
          condition_options: reuse(&previous.condition_options, next.condition_options),
          missing: next.missing,
        };
        if same_bundle(previous, &merged) {
          Arc::clone(previous)
        } else {
          Arc::new(merged)
        }
      }
      None => Arc::new(next),
    };

    self.current = Some(Arc::clone(&bundle));
    bundle
  }

  /// Drop the bundle when the dialog closes.
  pub fn clear(&mut self) {
    self.current = None;
  }
}

fn same_bundle(a: &DialogData, b: &DialogData) -> bool {
  Arc::ptr_eq(&a.categories, &b.categories)
    && Arc::ptr_eq(&a.locations, &b.locations)
    && Arc::ptr_eq(&a.employees, &b.employees)
    && Arc::ptr_eq(&a.status_options, &b.status_options)
    && Arc::ptr_eq(&a.condition_options, &b.condition_options)
    && a.missing == b.missing
}
