//! Import command: prepare, preview, confirm, commit

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Select};

use super::ImportArgs;
use crate::cli::{interactive, open_store, resolve_organization};
use crate::config::Config;
use crate::import::{
    CommitOutcome, ImportPipeline, ImportResult, PreparedBatch, SourceFile, SourceKind,
    list_sheets,
};

/// Rows listed individually before the rest is summarised
const PREVIEW_LIMIT: usize = 20;

pub async fn handle_import_command(args: ImportArgs, config: &Config) -> Result<()> {
    let org = resolve_organization(args.org, config)?;
    let mut options = config.import_options()?.dry_run(args.dry_run);
    if args.strict {
        options = options.strict(true);
    }

    let source = SourceFile::open(&args.file).await?;
    let sheet = match args.sheet {
        Some(sheet) => Some(sheet),
        None => pick_sheet(&source)?,
    };

    let store = open_store(config).await?;
    let pipeline = ImportPipeline::new(args.target, org, options);
    let schema = pipeline.schema();

    println!(
        "Importing {} into {}",
        source.name.cyan(),
        schema.label.bold()
    );

    let batch = pipeline.prepare(&store, &source, sheet.as_deref()).await?;
    print_preview(&batch);

    if !args.dry_run && !args.yes && interactive() {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Write {} records to {}?",
                batch.records.len(),
                schema.label
            ))
            .default(true)
            .interact()?;
        if !proceed {
            println!("{}", "Import cancelled, nothing was written".yellow());
            return Ok(());
        }
    }

    let result = pipeline.commit(&store, batch).await;
    print_result(&result);
    result.check()?;
    Ok(())
}

/// Ask for a sheet when the workbook has several and someone can answer
fn pick_sheet(source: &SourceFile) -> Result<Option<String>> {
    if source.kind != SourceKind::Workbook || !interactive() {
        return Ok(None);
    }
    let sheets = list_sheets(source)?;
    if sheets.len() < 2 {
        return Ok(None);
    }
    let choice = Select::new()
        .with_prompt("Sheet to import")
        .items(&sheets)
        .default(0)
        .interact()?;
    Ok(sheets.get(choice).cloned())
}

fn print_preview(batch: &PreparedBatch) {
    println!(
        "  {} rows read, {} ready",
        batch.rows_read,
        batch.records.len().to_string().green()
    );

    if !batch.rejected.is_empty() {
        println!("  {} rows skipped:", batch.rejected.len().to_string().yellow());
        for reject in batch.rejected.iter().take(PREVIEW_LIMIT) {
            println!("    row {:>5}  {}", reject.row_number, reject.reason);
        }
        if batch.rejected.len() > PREVIEW_LIMIT {
            println!("    ... and {} more", batch.rejected.len() - PREVIEW_LIMIT);
        }
    }

    if !batch.unresolved.is_empty() {
        println!(
            "  {} category links could not be resolved and will be left empty:",
            batch.unresolved.len().to_string().yellow()
        );
        for miss in batch.unresolved.iter().take(PREVIEW_LIMIT) {
            match miss.row_number {
                Some(row) => println!("    row {:>5}  {}", row, miss),
                None => println!("              {}", miss),
            }
        }
        if batch.unresolved.len() > PREVIEW_LIMIT {
            println!("    ... and {} more", batch.unresolved.len() - PREVIEW_LIMIT);
        }
    }
}

fn print_result(result: &ImportResult) {
    let line = result.summary();
    match &result.outcome {
        CommitOutcome::Success { .. } => println!("{} {}", "✓".green(), line),
        CommitOutcome::Skipped => println!("{} {}", "•".cyan(), line),
        CommitOutcome::Partial { failed_keys, .. } => {
            println!("{} {}", "!".yellow(), line);
            for key in failed_keys.iter().take(PREVIEW_LIMIT) {
                println!("    failed: {}", key);
            }
        }
        CommitOutcome::Failure { .. } => println!("{} {}", "✗".red(), line),
    }
    if let Some(count) = result.refreshed {
        log::debug!("{} now holds {} records", result.target, count);
    }
}
