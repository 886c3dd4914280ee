//! Grouping of employees and assets by department.

use std::collections::HashMap;
use std::sync::Arc;

use super::memo::Memo;
use crate::api::types::{Asset, Employee};

/// Members sharing one department, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentGroup<T> {
  pub count: usize,
  pub members: Vec<T>,
}

/// Department name -> group, iterated in order of first occurrence.
///
/// Records without a department are grouped under the empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentStats<T> {
  groups: Vec<(String, DepartmentGroup<T>)>,
  index: HashMap<String, usize>,
}

impl<T> DepartmentStats<T> {
  pub fn get(&self, department: &str) -> Option<&DepartmentGroup<T>> {
    self.index.get(department).map(|&i| &self.groups[i].1)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &DepartmentGroup<T>)> {
    self.groups.iter().map(|(name, group)| (name.as_str(), group))
  }

  pub fn departments(&self) -> impl Iterator<Item = &str> {
    self.groups.iter().map(|(name, _)| name.as_str())
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  /// Sum of all group counts; equals the number of input records.
  pub fn total(&self) -> usize {
    self.groups.iter().map(|(_, group)| group.count).sum()
  }
}

fn group_by_department<T: Clone>(
  records: &[T],
  department: impl Fn(&T) -> &str,
) -> DepartmentStats<T> {
  let mut groups: Vec<(String, DepartmentGroup<T>)> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for record in records {
    let name = department(record);
    let slot = match index.get(name) {
      Some(&slot) => slot,
      None => {
        index.insert(name.to_string(), groups.len());
        groups.push((
          name.to_string(),
          DepartmentGroup {
            count: 0,
            members: Vec::new(),
          },
        ));
        groups.len() - 1
      }
    };

    let group = &mut groups[slot].1;
    group.members.push(record.clone());
    group.count += 1;
  }

  DepartmentStats { groups, index }
}

/// Group employees by exact, case-sensitive department name.
pub fn aggregate_by_department(employees: &[Employee]) -> DepartmentStats<Employee> {
  group_by_department(employees, |employee| employee.department.as_str())
}

pub fn aggregate_assets_by_department(assets: &[Asset]) -> DepartmentStats<Asset> {
  group_by_department(assets, |asset| asset.department.as_str())
}

/// Department breakdown of the employee list, recomputed only when the list
/// changes.
#[derive(Debug, Default)]
pub struct DepartmentSummary {
  memo: Memo<DepartmentStats<Employee>>,
}

impl DepartmentSummary {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn stats(&mut self, employees: &[Employee]) -> Arc<DepartmentStats<Employee>> {
    self
      .memo
      .get_or_compute(employees, || aggregate_by_department(employees))
  }

  pub fn computations(&self) -> u64 {
    self.memo.computations()
  }
}
