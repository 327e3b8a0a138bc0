//! Subcommand arguments and handlers

pub mod export;
pub mod import;
pub mod lookup;
pub mod sheets;
pub mod template;

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::import::ImportTarget;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Workbook (.xlsx, .xls, .ods) or delimited text (.csv)
    pub file: PathBuf,

    /// master-ingredients, prepared-items, inventory, team, food-relationships
    #[arg(short, long)]
    pub target: ImportTarget,

    /// Organization the records belong to
    #[arg(long)]
    pub org: Option<String>,

    /// Sheet to read; asks when several exist, otherwise the first
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Validate and report without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Reject rows with unparseable numbers
    #[arg(long)]
    pub strict: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct SheetsArgs {
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[arg(short, long)]
    pub target: ImportTarget,

    /// Output path; `.csv` writes delimited text
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(short, long)]
    pub target: ImportTarget,

    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LookupCommands {
    /// Add names to a lookup table
    Add {
        /// food_category_groups, food_categories, food_sub_categories, vendors, storage_areas
        #[arg(long)]
        table: String,
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(long)]
        org: Option<String>,
    },
    /// List one lookup table, or all of them
    List {
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        org: Option<String>,
    },
}
