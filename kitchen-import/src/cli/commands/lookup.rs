use anyhow::{Result, bail};
use colored::*;

use super::LookupCommands;
use crate::cli::{open_store, resolve_organization};
use crate::config::Config;
use crate::import::targets::LOOKUP_TABLES;
use crate::store::DataStore;

pub async fn handle_lookup_command(cmd: LookupCommands, config: &Config) -> Result<()> {
    match cmd {
        LookupCommands::Add { table, names, org } => {
            check_table(&table)?;
            let org = resolve_organization(org, config)?;
            let store = open_store(config).await?;
            for name in &names {
                let entry = store.add_lookup(&org, &table, name).await?;
                println!("{} {} {}", "+".green(), entry.name.bold(), entry.id.dimmed());
            }
        }
        LookupCommands::List {
            table: Some(table),
            org,
        } => {
            check_table(&table)?;
            let org = resolve_organization(org, config)?;
            let store = open_store(config).await?;
            let entries = store.fetch_lookup(&org, &table).await?;
            if entries.is_empty() {
                println!("{} is empty", table.cyan());
            }
            for entry in entries {
                println!("{:<40} {}", entry.name, entry.id.dimmed());
            }
        }
        LookupCommands::List { table: None, org } => {
            let org = resolve_organization(org, config)?;
            let store = open_store(config).await?;
            let mut current: Option<String> = None;
            for (table, entry) in store.list_lookups(&org).await? {
                if current.as_deref() != Some(table.as_str()) {
                    println!("{}", table.cyan().bold());
                    current = Some(table);
                }
                println!("  {:<38} {}", entry.name, entry.id.dimmed());
            }
            if current.is_none() {
                println!("No lookup entries for {}", org);
            }
        }
    }
    Ok(())
}

fn check_table(table: &str) -> Result<()> {
    if !LOOKUP_TABLES.contains(&table) {
        bail!(
            "Unknown lookup table '{}'. Expected one of: {}",
            table,
            LOOKUP_TABLES.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_table() {
        assert!(check_table("vendors").is_ok());
        assert!(check_table("food_categories").is_ok());
        assert!(check_table("recipes").is_err());
    }
}
