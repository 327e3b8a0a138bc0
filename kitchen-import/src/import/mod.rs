//! Spreadsheet import pipeline
//!
//! Sheet reader -> row filter -> field mapper -> reference resolver ->
//! de-duplicator -> upsert committer, run once per import action. The
//! template generator and exporter go the other way, producing files shaped
//! like the importer expects.

pub mod commit;
pub mod dedup;
pub mod error;
pub mod export;
pub mod filter;
pub mod map;
pub mod pipeline;
pub mod resolve;
pub mod sheet;
pub mod targets;
pub mod template;
pub mod types;

pub use error::ImportError;
pub use export::{export_bytes, export_records};
pub use pipeline::{ImportOptions, ImportPipeline, PreparedBatch};
pub use sheet::{SourceFile, SourceKind, list_sheets, read_rows};
pub use template::{csv_template_bytes, template_bytes, write_template};
pub use types::*;

#[cfg(test)]
pub(crate) mod test_support {
    use rust_xlsxwriter::Workbook;

    /// Build an xlsx in memory; empty strings are left as blank cells
    pub fn workbook_bytes(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, text) in row.iter().enumerate() {
                    if !text.is_empty() {
                        sheet.write_string(r as u32, c as u16, *text).unwrap();
                    }
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }
}
