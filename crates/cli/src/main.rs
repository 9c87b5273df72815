// GridBase CLI - headless workspace operations

mod exit_codes;
mod export;
mod inspect;
mod util;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{CliError, EXIT_SUCCESS};
use gridbase_config::settings::Settings;
use gridbase_engine::workspace::Workspace;

#[derive(Parser)]
#[command(name = "gbase")]
#[command(about = "GridBase data workspace (CLI mode, headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new workspace file
    New {
        /// Output file (.gbase native, or .json)
        file: PathBuf,

        /// Name of the first sheet (defaults from settings)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show the sheet tree, table schemas, and relation health
    Inspect {
        file: PathBuf,
    },

    /// Export a workspace to interchange JSON
    Export {
        file: PathBuf,

        /// Output JSON file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Import interchange JSON into a native workspace file
    Import {
        /// Input JSON file
        file: PathBuf,

        /// Output native file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Print a sheet's visible rows under a view
    View {
        file: PathBuf,

        /// Sheet name (defaults to the active sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// View name (defaults to the sheet's active view)
        #[arg(long)]
        view: Option<String>,

        /// Free-text search, applied before the view's filters
        #[arg(long, default_value = "")]
        search: String,

        /// Partition the output by the view's group-by column
        #[arg(long)]
        grouped: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::New { file, name } => new_workspace(&file, name.as_deref()),
        Commands::Inspect { file } => inspect::run(&file),
        Commands::Export { file, output } => export::export(&file, &output),
        Commands::Import { file, output } => export::import(&file, &output),
        Commands::View { file, sheet, view, search, grouped } => {
            view::run(&file, sheet.as_deref(), view.as_deref(), &search, grouped)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message }) => {
            eprintln!("error: {}", message);
            ExitCode::from(code)
        }
    }
}

fn new_workspace(file: &PathBuf, name: Option<&str>) -> Result<(), CliError> {
    let settings = Settings::load();
    let mut ws = Workspace::new();
    let first = ws.sheets()[0].id;
    let name = name.unwrap_or(settings.default_sheet_name.as_str()).to_string();
    ws.rename_sheet(first, name).map_err(|e| e.to_string())?;
    util::save_workspace(&ws, file)
}
