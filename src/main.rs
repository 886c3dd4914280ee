use assetdesk::app::{Action, App};
use assetdesk::config::Config;
use assetdesk::logging;
use assetdesk::views::{AssetField, AssetFilter, SortOrder};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assetdesk")]
#[command(about = "Asset management console: reference data, asset lists and dialog data")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/assetdesk/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Show categories, condition options and status options
  Refdata,
  /// Show employees grouped by department
  Departments,
  /// List assets
  Assets {
    /// Sort column (e.g. assetCode, name, value, purchaseDate)
    #[arg(short, long, default_value = "assetCode")]
    sort: AssetField,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Case-insensitive search over code, name, serial number, assignee and tags
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Only assets with this status
    #[arg(long)]
    status: Option<String>,

    /// Only assets in this department
    #[arg(long)]
    department: Option<String>,
  },
  /// Summarize the data available to the asset dialogs
  Dialog,
}

impl From<Commands> for Action {
  fn from(command: Commands) -> Self {
    match command {
      Commands::Refdata => Action::Refdata,
      Commands::Departments => Action::Departments,
      Commands::Assets {
        sort,
        desc,
        search,
        status,
        department,
      } => Action::Assets {
        sort,
        order: if desc {
          SortOrder::Descending
        } else {
          SortOrder::Ascending
        },
        filter: AssetFilter {
          search,
          status,
          department,
          ..Default::default()
        },
      },
      Commands::Dialog => Action::Dialog,
    }
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Logs go to a file; keep the guard so they are flushed on exit
  let _guard = logging::init()?;

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  let app = App::new(&config)?;
  let output = app.run(args.command.into()).await?;
  print!("{}", output);

  Ok(())
}
