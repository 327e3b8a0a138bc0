//! Row filter: drop rows without both identity fields
//!
//! Spreadsheet exports often end with blank or placeholder rows; a row only
//! counts when its identifier and its name are present.

use crate::import::{RawRow, RejectReason, RejectedRow, TargetSchema};

/// Rows kept and rows dropped, both in source order
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub kept: Vec<RawRow>,
    pub dropped: Vec<RejectedRow>,
}

/// An identity cell counts when, trimmed, it is neither empty nor "0"
pub fn is_present(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text != "0"
}

/// Keep rows where both identity columns are present
pub fn filter_rows(rows: Vec<RawRow>, identity_columns: (&str, &str)) -> FilterOutcome {
    let (id_column, name_column) = identity_columns;
    let mut outcome = FilterOutcome::default();

    for row in rows {
        let missing = if !is_present(row.get(id_column)) {
            Some(id_column)
        } else if !is_present(row.get(name_column)) {
            Some(name_column)
        } else {
            None
        };

        match missing {
            None => outcome.kept.push(row),
            Some(column) => {
                log::debug!("Row {}: no {}, skipped", row.row_number, column);
                outcome.dropped.push(RejectedRow {
                    row_number: row.row_number,
                    reason: RejectReason::MissingIdentity {
                        field: column.to_string(),
                    },
                });
            }
        }
    }

    outcome
}

/// Filter using the schema's identity pair
pub fn filter_for_schema(rows: Vec<RawRow>, schema: &TargetSchema) -> FilterOutcome {
    let id_column = schema.column_for(schema.identity.0).unwrap_or(schema.identity.0);
    let name_column = schema.column_for(schema.identity.1).unwrap_or(schema.identity.1);
    filter_rows(rows, (id_column, name_column))
}
