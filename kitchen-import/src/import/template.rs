//! Template generator
//!
//! Produces an empty file whose header row matches the importer's expected
//! columns exactly, followed by one example row. Workbook templates get a
//! second "Instructions" sheet describing every column.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::import::map::{parse_currency, parse_number};
use crate::import::{InputFormat, TargetSchema, ValueType};

pub const INSTRUCTIONS_SHEET: &str = "Instructions";

/// Build the workbook template in memory
pub fn template_bytes(schema: &TargetSchema) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let data = workbook.add_worksheet();
    data.set_name(schema.label)?;
    write_data_sheet(data, schema, &bold)?;

    let instructions = workbook.add_worksheet();
    instructions.set_name(INSTRUCTIONS_SHEET)?;
    write_instructions(instructions, schema, &bold)?;

    workbook
        .save_to_buffer()
        .with_context(|| format!("Failed to build template for {}", schema.target))
}

/// Header row plus example row as comma-separated text
pub fn csv_template_bytes(schema: &TargetSchema) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(schema.headers())?;
    writer.write_record(schema.fields.iter().map(|f| f.example))?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV template: {}", e))
}

/// Write a template to disk
///
/// A `.csv` path always gets delimited text; any other path gets a workbook,
/// except for targets that are only ever imported from delimited text.
pub async fn write_template(schema: &TargetSchema, path: &Path) -> Result<()> {
    let wants_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let bytes = if wants_csv || schema.format == InputFormat::Delimited {
        csv_template_bytes(schema)?
    } else {
        template_bytes(schema)?
    };

    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write template: {}", path.display()))?;
    log::info!("Wrote {} template to {}", schema.target, path.display());
    Ok(())
}

fn write_data_sheet(ws: &mut Worksheet, schema: &TargetSchema, bold: &Format) -> Result<()> {
    for (col, field) in schema.fields.iter().enumerate() {
        let col = col as u16;
        ws.write_string_with_format(0, col, field.column, bold)?;

        // Numeric examples go in as numbers so the sheet behaves like a real export
        let number = match field.value_type {
            ValueType::Currency => parse_currency(field.example),
            ValueType::Number => parse_number(field.example),
            _ => None,
        };
        match number {
            Some(n) => ws.write_number(1, col, n)?,
            None => ws.write_string(1, col, field.example)?,
        };
    }
    ws.set_freeze_panes(1, 0)?;
    ws.autofit();
    Ok(())
}

fn write_instructions(ws: &mut Worksheet, schema: &TargetSchema, bold: &Format) -> Result<()> {
    ws.write_string_with_format(0, 0, "Column", bold)?;
    ws.write_string_with_format(0, 1, "Required", bold)?;
    ws.write_string_with_format(0, 2, "Type", bold)?;
    ws.write_string_with_format(0, 3, "Description", bold)?;

    let (id_field, name_field) = schema.identity;
    for (idx, field) in schema.fields.iter().enumerate() {
        let row = idx as u32 + 1;
        let required = field.name == id_field || field.name == name_field;
        let kind = match field.lookup {
            Some(_) => "Name lookup",
            None => field.value_type.label(),
        };
        ws.write_string(row, 0, field.column)?;
        ws.write_string(row, 1, if required { "Yes" } else { "No" })?;
        ws.write_string(row, 2, kind)?;
        ws.write_string(row, 3, field.description)?;
    }

    let mut row = schema.fields.len() as u32 + 2;
    for note in notes(schema) {
        ws.write_string(row, 0, note)?;
        row += 1;
    }
    ws.autofit();
    Ok(())
}

fn notes(schema: &TargetSchema) -> Vec<&'static str> {
    let mut notes = vec![
        "Fill in the first sheet; this sheet is ignored on import.",
        "Rows without both required columns are skipped.",
    ];
    match schema.format {
        InputFormat::Workbook => {
            notes.push("Columns are read by position: do not insert, remove or reorder columns.")
        }
        InputFormat::Delimited => {
            notes.push("Header names must match exactly, including capitalisation.")
        }
    }
    if schema.reference_fields().next().is_some() {
        notes.push("Lookup names must match existing entries (case does not matter).");
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::filter::filter_for_schema;
    use crate::import::map::{coerce_cell, map_row};
    use crate::import::{ImportTarget, SourceFile, list_sheets, read_rows};

    fn round_trip(schema: &TargetSchema, source: SourceFile) {
        let rows = read_rows(&source, schema, None, b',').unwrap();
        assert_eq!(rows.len(), 1, "{}", schema.target);

        let filtered = filter_for_schema(rows, schema);
        assert_eq!(filtered.kept.len(), 1, "{}", schema.target);

        let record = map_row(&filtered.kept[0], schema, "org-1", true).unwrap();
        for field in schema.fields {
            assert_eq!(
                record.get(field.name),
                &coerce_cell(field, field.example).value,
                "{} / {}",
                schema.target,
                field.column
            );
        }
    }

    #[test]
    fn test_workbook_templates_import_their_example_row() {
        for target in ImportTarget::ALL {
            let schema = target.schema();
            let bytes = template_bytes(schema).unwrap();
            round_trip(schema, SourceFile::from_bytes("template.xlsx", bytes));
        }
    }

    #[test]
    fn test_csv_templates_import_their_example_row() {
        for target in ImportTarget::ALL {
            let schema = target.schema();
            let bytes = csv_template_bytes(schema).unwrap();
            round_trip(schema, SourceFile::from_bytes("template.csv", bytes));
        }
    }

    #[test]
    fn test_template_sheets() {
        let schema = ImportTarget::MasterIngredient.schema();
        let source = SourceFile::from_bytes("t.xlsx", template_bytes(schema).unwrap());
        assert_eq!(
            list_sheets(&source).unwrap(),
            vec!["Master Ingredients".to_string(), INSTRUCTIONS_SHEET.to_string()]
        );
    }

    #[test]
    fn test_csv_header_matches_schema() {
        let schema = ImportTarget::TeamMember.schema();
        let text = String::from_utf8(csv_template_bytes(schema).unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "First Name,Last Name,Email,Mobile Phone,Wage,Punch ID,Locations,Departments,Roles"
        );
    }

    #[tokio::test]
    async fn test_write_template_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let schema = ImportTarget::InventoryItem.schema();

        let csv_path = dir.path().join("inventory.csv");
        write_template(schema, &csv_path).await.unwrap();
        let text = tokio::fs::read_to_string(&csv_path).await.unwrap();
        assert!(text.starts_with("Item ID,"));

        let xlsx_path = dir.path().join("inventory.xlsx");
        write_template(schema, &xlsx_path).await.unwrap();
        let bytes = tokio::fs::read(&xlsx_path).await.unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
