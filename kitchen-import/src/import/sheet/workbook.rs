//! Workbook (xlsx/xls/ods) sheet reading

use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};

use super::SourceFile;
use super::cells::cell_to_text;
use crate::import::{ImportError, RawRow, TargetSchema};

fn open(source: &SourceFile) -> Result<Sheets<Cursor<&[u8]>>, ImportError> {
    open_workbook_auto_from_rs(Cursor::new(source.bytes.as_slice()))
        .map_err(|e| ImportError::read(&source.name, e))
}

/// Sheet names in workbook order, so the caller can offer a choice
pub fn list_sheets(source: &SourceFile) -> Result<Vec<String>, ImportError> {
    let workbook = open(source)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read one sheet, binding columns to `schema` by position
///
/// Row 1 is the header and is skipped regardless of its text; data starts on
/// row 2. Completely blank rows are dropped.
pub fn read_sheet(
    source: &SourceFile,
    schema: &TargetSchema,
    sheet: Option<&str>,
) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open(source)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound {
                sheet: name.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::read(&source.name, "workbook has no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::read(&source.name, format!("sheet '{}': {}", sheet_name, e)))?;

    let rows = rows_from_range(&range, schema);
    log::debug!(
        "Sheet '{}' of {}: {} data rows bound to {} columns",
        sheet_name,
        source.name,
        rows.len(),
        schema.fields.len()
    );
    Ok(rows)
}

fn rows_from_range(range: &Range<Data>, schema: &TargetSchema) -> Vec<RawRow> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let start_col = start_col as usize;

    if range.width() + start_col > schema.fields.len() {
        log::debug!(
            "Sheet has {} columns, {} expected; extra columns ignored",
            range.width() + start_col,
            schema.fields.len()
        );
    }

    let mut rows = Vec::new();
    for (idx, cells) in range.rows().enumerate() {
        let sheet_row = start_row as usize + idx;
        // Row 1 is always the header; the used range may start below it
        if sheet_row == 0 {
            continue;
        }
        let row_number = sheet_row + 1;
        let mut row = RawRow::new(row_number);

        for (col, field) in schema.fields.iter().enumerate() {
            let text = col
                .checked_sub(start_col)
                .and_then(|rel| cells.get(rel))
                .map(cell_to_text)
                .unwrap_or_default();
            row.cells.insert(field.column.to_string(), text);
        }

        if row.is_blank() {
            log::debug!("Skipping blank row {}", row_number);
            continue;
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportTarget;
    use crate::import::test_support::workbook_bytes;

    #[test]
    fn test_list_sheets() {
        let bytes = workbook_bytes(&[
            ("Prices", vec![vec!["a"]]),
            ("Notes", vec![vec!["b"]]),
        ]);
        let source = SourceFile::from_bytes("prices.xlsx", bytes);
        assert_eq!(list_sheets(&source).unwrap(), vec!["Prices", "Notes"]);
    }

    #[test]
    fn test_read_sheet_binds_positionally() {
        let schema = ImportTarget::InventoryItem.schema();
        // Header text deliberately differs from the schema
        let bytes = workbook_bytes(&[(
            "Count",
            vec![
                vec!["id", "name", "cat", "vendor", "uom", "price", "adj"],
                vec!["BEEF-001", "Beef Brisket", "Beef", "Sysco", "CS", "$125.99", "$130"],
                vec!["", "", "", "", "", "", ""],
                vec!["PORK-002", "Pork Belly"],
            ],
        )]);
        let source = SourceFile::from_bytes("count.xlsx", bytes);

        let rows = read_sheet(&source, schema, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].get("Item ID"), "BEEF-001");
        assert_eq!(rows[0].get("Price"), "$125.99");
        assert_eq!(rows[1].row_number, 4);
        assert_eq!(rows[1].get("Product Name"), "Pork Belly");
        assert_eq!(rows[1].get("Vendor"), "");
    }

    #[test]
    fn test_blank_header_row_does_not_swallow_first_data_row() {
        let schema = ImportTarget::InventoryItem.schema();
        let bytes = workbook_bytes(&[(
            "Count",
            vec![
                vec![],
                vec!["501", "Flour", "", "", "LB", "$22.10"],
                vec!["502", "Sugar", "", "", "LB", "$18"],
            ],
        )]);
        let source = SourceFile::from_bytes("count.xlsx", bytes);

        let rows = read_sheet(&source, schema, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].get("Product Name"), "Flour");
        assert_eq!(rows[1].row_number, 3);
    }

    #[test]
    fn test_read_named_sheet() {
        let schema = ImportTarget::FoodRelationship.schema();
        let bytes = workbook_bytes(&[
            ("Readme", vec![vec!["ignore me"], vec!["still ignored"]]),
            (
                "Taxonomy",
                vec![
                    vec!["Major Group", "Category", "Sub Category", "Description"],
                    vec!["Proteins", "Beef", "Ground", "Ground beef blends"],
                ],
            ),
        ]);
        let source = SourceFile::from_bytes("taxonomy.xlsx", bytes);

        let rows = read_sheet(&source, schema, Some("Taxonomy")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Sub Category"), "Ground");

        let err = read_sheet(&source, schema, Some("Missing")).unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound { .. }));
    }

    #[test]
    fn test_non_workbook_bytes_are_read_error() {
        let source = SourceFile::from_bytes("prices.xlsx", b"this is not a spreadsheet".to_vec());
        let err = read_sheet(&source, ImportTarget::MasterIngredient.schema(), None).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
        assert!(matches!(list_sheets(&source), Err(ImportError::Read { .. })));
    }
}
