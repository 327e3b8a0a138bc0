//! Sheet reader: turns an uploaded file into [`RawRow`]s
//!
//! Workbooks are bound to the target schema by column position, delimited
//! text by literal header name.

mod cells;
mod delimited;
mod workbook;

use std::path::Path;

use crate::import::{ImportError, RawRow, TargetSchema};

pub use cells::cell_to_text;
pub use delimited::{read_delimited, strip_bom};
pub use workbook::{list_sheets, read_sheet};

/// Broad file family, decided from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Workbook,
    Delimited,
}

impl SourceKind {
    /// Detect the kind from a file name's extension
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "tsv" | "txt" => SourceKind::Delimited,
            _ => SourceKind::Workbook,
        }
    }
}

/// An uploaded file held in memory
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name, used for diagnostics and format detection
    pub name: String,
    pub kind: SourceKind,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        SourceFile {
            kind: SourceKind::from_name(&name),
            name,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn open(path: &Path) -> Result<Self, ImportError> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ImportError::read(path.display().to_string(), e))?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::from_bytes(name, bytes))
    }
}

/// Read the rows of a source file against a schema
///
/// `sheet` selects a workbook sheet (first sheet when `None`) and is ignored
/// for delimited text.
pub fn read_rows(
    source: &SourceFile,
    schema: &TargetSchema,
    sheet: Option<&str>,
    delimiter: u8,
) -> Result<Vec<RawRow>, ImportError> {
    let rows = match source.kind {
        SourceKind::Workbook => read_sheet(source, schema, sheet)?,
        SourceKind::Delimited => read_delimited(source, schema, delimiter)?,
    };
    log::info!("Read {} rows from {}", rows.len(), source.name);
    Ok(rows)
}
