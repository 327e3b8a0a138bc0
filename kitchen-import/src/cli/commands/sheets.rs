use anyhow::Result;
use colored::*;

use super::SheetsArgs;
use crate::import::{SourceFile, SourceKind, list_sheets};

pub async fn handle_sheets_command(args: SheetsArgs) -> Result<()> {
    let source = SourceFile::open(&args.file).await?;
    if source.kind == SourceKind::Delimited {
        println!("{} is delimited text and has no sheets", source.name.cyan());
        return Ok(());
    }

    for (idx, name) in list_sheets(&source)?.iter().enumerate() {
        let marker = if idx == 0 { " (default)".dimmed().to_string() } else { String::new() };
        println!("{}{}", name.bright_white(), marker);
    }
    Ok(())
}
