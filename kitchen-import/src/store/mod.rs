//! Data-store collaborator
//!
//! The import pipeline only talks to storage through [`DataStore`]: reading
//! lookup tables, one bulk upsert per run, and a refresh afterwards.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::import::{LookupEntry, ValidatedRecord};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// What a bulk upsert reports back
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertOutcome {
    pub written: usize,
    /// Natural keys that were not applied (non-atomic stores only)
    pub failed_keys: Vec<String>,
}

impl UpsertOutcome {
    pub fn all(written: usize) -> Self {
        UpsertOutcome {
            written,
            failed_keys: Vec::new(),
        }
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    /// `{id, name}` rows of a reference table for one organization
    async fn fetch_lookup(&self, organization_id: &str, table: &str) -> Result<Vec<LookupEntry>>;

    /// Insert or replace records by natural key
    ///
    /// Never deletes rows that are absent from `records`.
    async fn upsert(
        &self,
        organization_id: &str,
        table: &str,
        key_column: &str,
        records: &[ValidatedRecord],
    ) -> Result<UpsertOutcome>;

    /// Every record of a table for one organization
    async fn fetch_all(&self, organization_id: &str, table: &str) -> Result<Vec<ValidatedRecord>>;

    /// Whether one `upsert` call applies all of its records or none
    fn atomic_upsert(&self) -> bool {
        true
    }
}
