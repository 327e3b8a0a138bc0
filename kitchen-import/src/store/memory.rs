//! In-process data store
//!
//! Used for previews and tests. Can be switched to non-atomic mode with
//! injected per-key failures to exercise partial commits.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::{DataStore, UpsertOutcome};
use crate::import::{LookupEntry, ValidatedRecord};

type TableKey = (String, String);

#[derive(Debug, Default)]
struct MemoryState {
    lookups: HashMap<TableKey, Vec<LookupEntry>>,
    /// Records per table in first-insert order
    records: HashMap<TableKey, Vec<ValidatedRecord>>,
    upsert_calls: usize,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    atomic: bool,
    failing_keys: HashSet<String>,
    fail_with: Option<String>,
    lookup_error: Option<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            state: Mutex::new(MemoryState::default()),
            atomic: true,
            failing_keys: HashSet::new(),
            fail_with: None,
            lookup_error: None,
        }
    }
}

fn table_key(organization_id: &str, table: &str) -> TableKey {
    (organization_id.to_string(), table.to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a lookup table
    pub fn with_lookup(self, organization_id: &str, table: &str, names: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state();
            let entries = state
                .lookups
                .entry(table_key(organization_id, table))
                .or_default();
            entries.extend(names.iter().map(|(id, name)| LookupEntry::new(*id, *name)));
        }
        self
    }

    /// Seed existing records
    pub fn with_records(self, table: &str, records: Vec<ValidatedRecord>) -> Self {
        {
            let mut state = self.state();
            for record in records {
                state
                    .records
                    .entry(table_key(&record.organization_id, table))
                    .or_default()
                    .push(record);
            }
        }
        self
    }

    /// Behave like a backend without batch atomicity: these keys fail,
    /// everything else is applied
    pub fn non_atomic_failing(mut self, keys: &[&str]) -> Self {
        self.atomic = false;
        self.failing_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Make every upsert call fail with this message
    pub fn failing_with(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Make every lookup fetch fail with this message
    pub fn failing_lookup(mut self, message: &str) -> Self {
        self.lookup_error = Some(message.to_string());
        self
    }

    /// How many times `upsert` was called
    pub fn upsert_calls(&self) -> usize {
        self.state().upsert_calls
    }

    /// Snapshot of a table's records
    pub fn records(&self, organization_id: &str, table: &str) -> Vec<ValidatedRecord> {
        self.state()
            .records
            .get(&table_key(organization_id, table))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn fetch_lookup(&self, organization_id: &str, table: &str) -> Result<Vec<LookupEntry>> {
        if let Some(message) = &self.lookup_error {
            bail!("{}", message);
        }
        Ok(self
            .state()
            .lookups
            .get(&table_key(organization_id, table))
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        organization_id: &str,
        table: &str,
        key_column: &str,
        records: &[ValidatedRecord],
    ) -> Result<UpsertOutcome> {
        let mut state = self.state();
        state.upsert_calls += 1;

        if let Some(message) = &self.fail_with {
            bail!("{}", message);
        }

        if self.atomic {
            if let Some(bad) = records
                .iter()
                .find(|r| self.failing_keys.contains(&r.natural_key))
            {
                bail!(
                    "constraint violation on {} = '{}', batch rolled back",
                    key_column,
                    bad.natural_key
                );
            }
        }

        let stored = state
            .records
            .entry(table_key(organization_id, table))
            .or_default();
        let mut outcome = UpsertOutcome::default();

        for record in records {
            if self.failing_keys.contains(&record.natural_key) {
                outcome.failed_keys.push(record.natural_key.clone());
                continue;
            }
            let mut record = record.clone();
            record.source_row = None;
            match stored
                .iter_mut()
                .find(|existing| existing.natural_key == record.natural_key)
            {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
            outcome.written += 1;
        }

        Ok(outcome)
    }

    async fn fetch_all(&self, organization_id: &str, table: &str) -> Result<Vec<ValidatedRecord>> {
        Ok(self.records(organization_id, table))
    }

    fn atomic_upsert(&self) -> bool {
        self.atomic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::Value;

    fn record(key: &str, price: f64) -> ValidatedRecord {
        let mut r = ValidatedRecord::new("org-1", key);
        r.set("case_price", Value::Number(price));
        r
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_key_and_keeps_others() {
        let store = MemoryStore::new().with_records("items", vec![record("A", 1.0), record("B", 2.0)]);

        let outcome = store
            .upsert("org-1", "items", "item_code", &[record("B", 20.0), record("C", 3.0)])
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::all(2));

        let all = store.fetch_all("org-1", "items").await.unwrap();
        let keys: Vec<_> = all.iter().map(|r| r.natural_key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(all[1].get("case_price"), &Value::Number(20.0));
    }

    #[tokio::test]
    async fn test_atomic_failure_applies_nothing() {
        let store = MemoryStore::new().non_atomic_failing(&["B"]);
        let store = MemoryStore { atomic: true, ..store };

        let err = store
            .upsert("org-1", "items", "item_code", &[record("A", 1.0), record("B", 2.0)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rolled back"));
        assert!(store.records("org-1", "items").is_empty());
    }

    #[tokio::test]
    async fn test_non_atomic_reports_failed_keys() {
        let store = MemoryStore::new().non_atomic_failing(&["B"]);
        assert!(!store.atomic_upsert());

        let outcome = store
            .upsert("org-1", "items", "item_code", &[record("A", 1.0), record("B", 2.0)])
            .await
            .unwrap();
        assert_eq!(outcome.written, 1);
        assert_eq!(outcome.failed_keys, vec!["B".to_string()]);
        assert_eq!(store.records("org-1", "items").len(), 1);
    }

    #[tokio::test]
    async fn test_lookups_are_scoped_by_organization() {
        let store = MemoryStore::new().with_lookup("org-1", "vendors", &[("v-1", "Sysco")]);
        assert_eq!(store.fetch_lookup("org-1", "vendors").await.unwrap().len(), 1);
        assert!(store.fetch_lookup("org-2", "vendors").await.unwrap().is_empty());
    }
}
