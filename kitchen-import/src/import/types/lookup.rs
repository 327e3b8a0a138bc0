//! Lookup tables for reference resolution
//!
//! A [`LookupIndex`] is built once per import run from the organization's
//! reference tables and dropped with the run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of a reference table as returned by the data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: String,
    pub name: String,
}

impl LookupEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        LookupEntry {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Result of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult {
    Found(String),
    NotFound,
}

/// Normalized display name used as the index key
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// In-memory map: table -> (lowercased trimmed name -> id)
#[derive(Debug, Default)]
pub struct LookupIndex {
    tables: HashMap<String, HashMap<String, String>>,
}

impl LookupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table's entries to the index
    ///
    /// When two entries normalize to the same name the first one is kept.
    pub fn insert_table(&mut self, table: &str, entries: &[LookupEntry]) {
        let index = self.tables.entry(table.to_string()).or_default();
        for entry in entries {
            let key = normalize_name(&entry.name);
            if key.is_empty() {
                continue;
            }
            if let Some(existing) = index.get(&key) {
                log::warn!(
                    "Lookup table '{}' has duplicate name '{}' (keeping id {}, ignoring {})",
                    table,
                    entry.name,
                    existing,
                    entry.id
                );
                continue;
            }
            index.insert(key, entry.id.clone());
        }
        log::debug!("Lookup table '{}': {} names indexed", table, index.len());
    }

    /// Resolve a display name in a table, case-insensitive and trimmed
    pub fn resolve(&self, table: &str, name: &str) -> ResolveResult {
        match self
            .tables
            .get(table)
            .and_then(|t| t.get(&normalize_name(name)))
        {
            Some(id) => ResolveResult::Found(id.clone()),
            None => ResolveResult::NotFound,
        }
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Number of names indexed for a table
    pub fn table_len(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_case_insensitive_trimmed() {
        let mut index = LookupIndex::new();
        index.insert_table(
            "food_category_groups",
            &[LookupEntry::new("g-1", "Proteins"), LookupEntry::new("g-2", "Produce")],
        );

        assert_eq!(
            index.resolve("food_category_groups", " proteins "),
            ResolveResult::Found("g-1".into())
        );
        assert_eq!(
            index.resolve("food_category_groups", "PRODUCE"),
            ResolveResult::Found("g-2".into())
        );
        assert_eq!(
            index.resolve("food_category_groups", "Protein"),
            ResolveResult::NotFound
        );
        assert_eq!(index.resolve("vendors", "Proteins"), ResolveResult::NotFound);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let mut index = LookupIndex::new();
        index.insert_table(
            "vendors",
            &[LookupEntry::new("v-1", "Sysco"), LookupEntry::new("v-2", "SYSCO ")],
        );
        assert_eq!(index.table_len("vendors"), 1);
        assert_eq!(index.resolve("vendors", "sysco"), ResolveResult::Found("v-1".into()));
    }
}
