//! Export stored records back to a workbook laid out like the template
//!
//! Reference ids are written as their display names so the file can be
//! edited and imported again.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use crate::import::{TargetSchema, ValidatedRecord, Value};
use crate::store::DataStore;

/// Build the export workbook in memory; returns the bytes and record count
pub async fn export_bytes(
    store: &dyn DataStore,
    schema: &TargetSchema,
    organization_id: &str,
) -> Result<(Vec<u8>, usize)> {
    let records = store
        .fetch_all(organization_id, schema.table)
        .await
        .with_context(|| format!("Failed to fetch {}", schema.table))?;

    let mut names: HashMap<&str, HashMap<String, String>> = HashMap::new();
    for table in schema.lookup_tables() {
        let entries = store
            .fetch_lookup(organization_id, table)
            .await
            .with_context(|| format!("Failed to fetch lookup table {}", table))?;
        names.insert(
            table,
            entries.into_iter().map(|e| (e.id, e.name)).collect(),
        );
    }

    let bytes = write_workbook(schema, &records, &names)?;
    Ok((bytes, records.len()))
}

/// Export one table to an xlsx file
pub async fn export_records(
    store: &dyn DataStore,
    schema: &TargetSchema,
    organization_id: &str,
    path: &Path,
) -> Result<usize> {
    let (bytes, count) = export_bytes(store, schema, organization_id).await?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write export: {}", path.display()))?;
    log::info!("📊 Exported {} {} records to {}", count, schema.target, path.display());
    Ok(count)
}

fn write_workbook(
    schema: &TargetSchema,
    records: &[ValidatedRecord],
    names: &HashMap<&str, HashMap<String, String>>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let ws = workbook.add_worksheet();
    ws.set_name(schema.label)?;

    for (col, field) in schema.fields.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, field.column, &bold)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, field) in schema.fields.iter().enumerate() {
            let col = col as u16;
            match record.get(field.name) {
                Value::Null => {}
                Value::Number(n) => {
                    ws.write_number(row, col, *n)?;
                }
                Value::Bool(b) => {
                    ws.write_string(row, col, if *b { "true" } else { "false" })?;
                }
                Value::String(s) => {
                    let text = match field.lookup.and_then(|t| names.get(t)) {
                        Some(table) => match table.get(s) {
                            Some(name) => name.as_str(),
                            None => {
                                log::warn!(
                                    "{}: {} id '{}' has no name, exported as-is",
                                    record.natural_key,
                                    field.column,
                                    s
                                );
                                s.as_str()
                            }
                        },
                        None => s.as_str(),
                    };
                    ws.write_string(row, col, text)?;
                }
            }
        }
    }

    ws.set_freeze_panes(1, 0)?;
    ws.autofit();
    workbook
        .save_to_buffer()
        .with_context(|| format!("Failed to build export for {}", schema.target))
}
