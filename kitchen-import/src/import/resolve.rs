//! Reference resolver: swap display names for lookup ids
//!
//! Matching is exact after trimming and lowercasing. A miss is not fatal;
//! the field is nulled and the miss is reported in the run summary.

use crate::import::{
    ImportError, LookupIndex, ReferenceMiss, ResolveResult, TargetSchema, ValidatedRecord, Value,
};
use crate::store::DataStore;

/// Load every lookup table the schema references for one organization
pub async fn build_lookup_index(
    store: &dyn DataStore,
    organization_id: &str,
    schema: &TargetSchema,
) -> Result<LookupIndex, ImportError> {
    let mut index = LookupIndex::new();

    for table in schema.lookup_tables() {
        let entries = store
            .fetch_lookup(organization_id, table)
            .await
            .map_err(|e| ImportError::Lookup {
                table: table.to_string(),
                reason: format!("{:#}", e),
            })?;
        if entries.is_empty() {
            log::warn!(
                "Lookup table '{}' is empty for organization {}",
                table,
                organization_id
            );
        }
        index.insert_table(table, &entries);
    }

    Ok(index)
}

/// Resolve every reference field of a record in place
///
/// Returns the misses; blank fields are left null and are not misses.
pub fn resolve_references(
    record: &mut ValidatedRecord,
    schema: &TargetSchema,
    index: &LookupIndex,
) -> Vec<ReferenceMiss> {
    let mut misses = Vec::new();

    for spec in schema.reference_fields() {
        let Some(table) = spec.lookup else {
            continue;
        };
        let Some(name) = record.get(spec.name).as_str().map(|s| s.to_string()) else {
            continue;
        };
        if name.trim().is_empty() {
            record.set(spec.name, Value::Null);
            continue;
        }

        match index.resolve(table, &name) {
            ResolveResult::Found(id) => record.set(spec.name, Value::String(id)),
            ResolveResult::NotFound => {
                log::warn!(
                    "{}: {} '{}' not found in {}, leaving it unlinked",
                    record.natural_key,
                    spec.column,
                    name,
                    table
                );
                record.set(spec.name, Value::Null);
                misses.push(ReferenceMiss {
                    row_number: record.source_row,
                    natural_key: record.natural_key.clone(),
                    field: spec.name.to_string(),
                    table: table.to_string(),
                    value: name,
                });
            }
        }
    }

    misses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::targets::{CATEGORIES, CATEGORY_GROUPS, VENDORS};
    use crate::import::{ImportTarget, LookupEntry};
    use crate::store::MemoryStore;

    fn index() -> LookupIndex {
        let mut index = LookupIndex::new();
        index.insert_table(CATEGORY_GROUPS, &[LookupEntry::new("g-1", "Proteins")]);
        index.insert_table(CATEGORIES, &[LookupEntry::new("c-1", "Beef")]);
        index.insert_table(VENDORS, &[]);
        index
    }

    #[test]
    fn test_resolves_case_insensitive_and_nulls_misses() {
        let schema = ImportTarget::MasterIngredient.schema();
        let mut record = ValidatedRecord::new("org-1", "BEEF-001");
        record.source_row = Some(2);
        record.set("major_group", Value::from(" proteins "));
        record.set("category", Value::from("BEEF"));
        record.set("vendor", Value::from("Sysco"));
        record.set("sub_category", Value::Null);

        let misses = resolve_references(&mut record, schema, &index());

        assert_eq!(record.get("major_group"), &Value::String("g-1".into()));
        assert_eq!(record.get("category"), &Value::String("c-1".into()));
        assert_eq!(record.get("vendor"), &Value::Null);
        assert_eq!(record.get("sub_category"), &Value::Null);
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].field, "vendor");
        assert_eq!(misses[0].value, "Sysco");
        assert_eq!(misses[0].row_number, Some(2));
    }

    #[tokio::test]
    async fn test_build_index_loads_only_referenced_tables() {
        let store = MemoryStore::new()
            .with_lookup("org-1", CATEGORIES, &[("c-1", "Beef")])
            .with_lookup("org-1", "storage_areas", &[("s-1", "Walk-in")]);
        let index = build_lookup_index(&store, "org-1", ImportTarget::InventoryItem.schema())
            .await
            .unwrap();

        assert!(index.has_table(CATEGORIES));
        assert!(index.has_table(VENDORS));
        assert!(!index.has_table("storage_areas"));
        assert_eq!(index.table_len(CATEGORIES), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_fetch_is_lookup_error() {
        let store = MemoryStore::new().failing_lookup("connection refused");
        let schema = ImportTarget::PreparedItem.schema();

        let err = build_lookup_index(&store, "org-1", schema).await.unwrap_err();
        match err {
            ImportError::Lookup { table, reason } => {
                assert_eq!(table, CATEGORIES);
                assert!(reason.contains("connection refused"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
