//! Command-line surface

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

use crate::config::Config;
use crate::store::SqliteStore;
use commands::{ExportArgs, ImportArgs, LookupCommands, SheetsArgs, TemplateArgs};

#[derive(Parser, Debug)]
#[command(name = "kitchen-import", version, about = "Import kitchen back-office spreadsheets")]
pub struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides config and KITCHEN_IMPORT_DATABASE)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a workbook or CSV file
    Import(ImportArgs),
    /// List the sheets of a workbook
    Sheets(SheetsArgs),
    /// Write an empty template for a target
    Template(TemplateArgs),
    /// Export stored records to a workbook
    Export(ExportArgs),
    /// Manage lookup tables (categories, vendors, storage areas)
    #[command(subcommand)]
    Lookup(LookupCommands),
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load()?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    match cli.command {
        Commands::Import(args) => commands::import::handle_import_command(args, &config).await,
        Commands::Sheets(args) => commands::sheets::handle_sheets_command(args).await,
        Commands::Template(args) => commands::template::handle_template_command(args).await,
        Commands::Export(args) => commands::export::handle_export_command(args, &config).await,
        Commands::Lookup(cmd) => commands::lookup::handle_lookup_command(cmd, &config).await,
    }
}

/// Organization from the flag, falling back to config
pub(crate) fn resolve_organization(flag: Option<String>, config: &Config) -> Result<String> {
    flag.or_else(|| config.organization_id.clone())
        .filter(|org| !org.trim().is_empty())
        .context("No organization given. Pass --org or set KITCHEN_IMPORT_ORG")
}

pub(crate) async fn open_store(config: &Config) -> Result<SqliteStore> {
    log::debug!("Opening database {}", config.database_path.display());
    SqliteStore::open(&config.database_path).await
}

/// Prompts only make sense with a person on both ends
pub(crate) fn interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}
