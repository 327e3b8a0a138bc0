//! De-duplicator: first occurrence of a natural key wins
//!
//! Later logic and previews rely on the batch staying in spreadsheet order,
//! so duplicates are dropped rather than merged.

use std::collections::HashMap;

use crate::import::{RejectReason, RejectedRow, ValidatedRecord};

/// Drop records whose natural key was already seen, keeping order
pub fn dedup(records: Vec<ValidatedRecord>) -> (Vec<ValidatedRecord>, Vec<RejectedRow>) {
    let mut seen: HashMap<String, Option<usize>> = HashMap::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();

    for record in records {
        let key = record.natural_key.trim().to_string();
        if let Some(first_row) = seen.get(&key) {
            log::warn!(
                "Duplicate key '{}' on row {:?}, keeping the first occurrence",
                key,
                record.source_row
            );
            dropped.push(RejectedRow {
                row_number: record.source_row.unwrap_or_default(),
                reason: RejectReason::Duplicate {
                    key,
                    first_row: *first_row,
                },
            });
            continue;
        }
        seen.insert(key, record.source_row);
        kept.push(record);
    }

    (kept, dropped)
}
