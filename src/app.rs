use crate::api::cache::ReferenceKind;
use crate::api::cached_client::CachedConsoleClient;
use crate::api::types::{Asset, ReferenceItem};
use crate::cache::Snapshot;
use crate::config::Config;
use crate::dialog::{DialogComposer, DialogSource};
use crate::views::{aggregate_by_department, AssetField, AssetFilter, AssetTable, SortOrder};
use color_eyre::{eyre::eyre, Result};
use tracing::info;

/// What the user asked the binary to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  /// Print the cached reference collections
  Refdata,
  /// Print employees grouped by department
  Departments,
  /// Print the asset list, filtered and sorted
  Assets {
    sort: AssetField,
    order: SortOrder,
    filter: AssetFilter,
  },
  /// Print a summary of the asset dialog bundle
  Dialog,
}

/// Main application state
pub struct App {
  client: CachedConsoleClient,
}

impl App {
  pub fn new(config: &Config) -> Result<Self> {
    let client = CachedConsoleClient::new(config)?;
    Ok(Self { client })
  }

  pub fn with_client(client: CachedConsoleClient) -> Self {
    Self { client }
  }

  pub async fn run(&self, action: Action) -> Result<String> {
    info!(?action, "running");
    match action {
      Action::Refdata => Ok(self.refdata().await),
      Action::Departments => self.departments().await,
      Action::Assets {
        sort,
        order,
        filter,
      } => self.assets(sort, order, filter).await,
      Action::Dialog => Ok(self.dialog().await),
    }
  }

  async fn refdata(&self) -> String {
    let mut out = String::new();
    for kind in ReferenceKind::ALL {
      let snapshot = self.client.references(kind).await;
      render_reference(&mut out, kind.title(), &snapshot);
    }
    out
  }

  async fn departments(&self) -> Result<String> {
    let employees = self
      .client
      .employees()
      .await
      .map_err(|e| eyre!("Failed to load employees: {}", e))?;
    let stats = aggregate_by_department(&employees);

    let mut out = String::new();
    for (department, group) in stats.iter() {
      let name = if department.is_empty() {
        "(no department)"
      } else {
        department
      };
      out.push_str(&format!("{} ({})\n", name, group.count));
      for employee in &group.members {
        match &employee.position {
          Some(position) => out.push_str(&format!("  {} - {}\n", employee.name, position)),
          None => out.push_str(&format!("  {}\n", employee.name)),
        }
      }
    }
    Ok(out)
  }

  async fn assets(&self, sort: AssetField, order: SortOrder, filter: AssetFilter) -> Result<String> {
    let assets = self
      .client
      .assets()
      .await
      .map_err(|e| eyre!("Failed to load assets: {}", e))?;

    let mut table = AssetTable::new().with_filter(filter);
    table.sort_explicit(sort, order);
    let rows = table.rows(&assets);

    Ok(render_assets(&rows))
  }

  async fn dialog(&self) -> String {
    let sources = self.client.dialog_sources().await;
    let mut composer = DialogComposer::new();
    let data = composer.recompose(&sources);

    let counts = [
      (DialogSource::Categories, data.categories.len()),
      (DialogSource::Locations, data.locations.len()),
      (DialogSource::Employees, data.employees.len()),
      (DialogSource::StatusOptions, data.status_options.len()),
      (DialogSource::ConditionOptions, data.condition_options.len()),
    ];

    let mut out = String::new();
    for (source, count) in counts {
      if data.is_available(source) {
        out.push_str(&format!("{:<20}{}\n", source, count));
      } else {
        out.push_str(&format!("{:<20}not available\n", source));
      }
    }
    out
  }
}

fn render_reference(out: &mut String, title: &str, snapshot: &Snapshot<ReferenceItem>) {
  out.push_str(&format!("{}:\n", title));
  if let Some(error) = &snapshot.error {
    out.push_str(&format!("  ! {}\n", error));
  }
  if snapshot.items.is_empty() {
    out.push_str("  (none)\n");
  }
  for item in snapshot.items.iter() {
    out.push_str(&format!("  {:<8} {}\n", item.id, item.label));
  }
}

fn render_assets(rows: &[Asset]) -> String {
  let mut out = format!(
    "{:<12} {:<28} {:<14} {:<12} {:<14} {}\n",
    "CODE", "NAME", "CATEGORY", "STATUS", "DEPARTMENT", "ASSIGNEE"
  );
  for asset in rows {
    out.push_str(&format!(
      "{:<12} {:<28} {:<14} {:<12} {:<14} {}\n",
      truncate(&asset.asset_code, 12),
      truncate(&asset.name, 28),
      truncate(&asset.category, 14),
      truncate(&asset.status, 12),
      truncate(&asset.department, 14),
      asset.assignee.as_deref().unwrap_or("-"),
    ));
  }
  out
}

fn truncate(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    text.to_string()
  } else {
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
  }
}
