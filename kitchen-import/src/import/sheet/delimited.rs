//! Delimited text (CSV) reading with literal header validation

use csv::ReaderBuilder;

use super::SourceFile;
use crate::import::{ImportError, InputFormat, RawRow, TargetSchema};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Drop a leading UTF-8 byte-order mark
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Headers a delimited file must carry verbatim
///
/// Targets exported as delimited text need every column. Workbook targets
/// saved as CSV only need their required and identity columns; the rest
/// read as empty.
pub fn required_headers(schema: &TargetSchema) -> Vec<&'static str> {
    match schema.format {
        InputFormat::Delimited => schema.headers(),
        InputFormat::Workbook => {
            let (id_field, name_field) = schema.identity;
            schema
                .fields
                .iter()
                .filter(|f| f.required || f.name == id_field || f.name == name_field)
                .map(|f| f.column)
                .collect()
        }
    }
}

/// Read delimited text, checking its header row against [`required_headers`]
pub fn read_delimited(
    source: &SourceFile,
    schema: &TargetSchema,
    delimiter: u8,
) -> Result<Vec<RawRow>, ImportError> {
    let data = strip_bom(&source.bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::read(&source.name, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let missing: Vec<String> = required_headers(schema)
        .into_iter()
        .filter(|expected| !headers.iter().any(|h| h == expected))
        .map(|h| h.to_string())
        .collect();
    if !missing.is_empty() {
        log::warn!("{} is missing columns: {:?}", source.name, missing);
        return Err(ImportError::Schema { missing });
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ImportError::read(&source.name, e))?;
        let mut row = RawRow::new(idx + 2);
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.cells.insert(header.clone(), cell.to_string());
        }
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}
