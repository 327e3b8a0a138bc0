use anyhow::Result;
use colored::*;

use super::ExportArgs;
use crate::cli::{open_store, resolve_organization};
use crate::config::Config;
use crate::import::export_records;

pub async fn handle_export_command(args: ExportArgs, config: &Config) -> Result<()> {
    let org = resolve_organization(args.org, config)?;
    let store = open_store(config).await?;
    let schema = args.target.schema();

    let count = export_records(&store, schema, &org, &args.output).await?;
    println!(
        "Exported {} {} records to {}",
        count.to_string().bold(),
        schema.label,
        args.output.display().to_string().bright_green()
    );
    Ok(())
}
