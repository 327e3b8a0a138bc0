//! Fatal import errors
//!
//! Soft problems (unresolved references, skipped rows) are collected on the
//! [`ImportResult`](super::ImportResult) instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// File unreadable or not the format its name claims
    #[error("could not read {source_name}: {reason}")]
    Read { source_name: String, reason: String },

    /// Delimited file missing required header names
    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// Nothing survived the row filter
    #[error("no valid rows found in {source_name}")]
    EmptyData { source_name: String },

    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// Reference tables could not be loaded before mapping
    #[error("could not load lookup table {table}: {reason}")]
    Lookup { table: String, reason: String },

    /// The bulk upsert call itself failed
    #[error("could not save to {table}: {reason}")]
    Commit { table: String, reason: String },

    /// Non-atomic store applied part of the batch
    #[error("{written} rows saved, {} failed: {}", failed_keys.len(), failed_keys.join(", "))]
    PartialCommit {
        written: usize,
        failed_keys: Vec<String>,
    },
}

impl ImportError {
    pub fn read(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ImportError::Read {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors raised before anything was sent to the data store
    pub fn is_pre_commit(&self) -> bool {
        !matches!(
            self,
            ImportError::Commit { .. } | ImportError::PartialCommit { .. }
        )
    }
}
