//! Upsert committer: one bulk write per import, then a refresh

use anyhow::Result;

use crate::import::{ImportError, TargetSchema, ValidatedRecord};
use crate::store::DataStore;

/// Send the batch to the store as a single insert-or-replace by natural key
///
/// Returns the number of rows written. A store that is not atomic and
/// reports failed keys yields [`ImportError::PartialCommit`].
pub async fn commit_batch(
    store: &dyn DataStore,
    schema: &TargetSchema,
    organization_id: &str,
    records: &[ValidatedRecord],
) -> Result<usize, ImportError> {
    let key_column = schema.natural_key_column();
    log::info!(
        "Upserting {} records into {} keyed by ({}, {})",
        records.len(),
        schema.table,
        organization_id,
        key_column
    );

    let outcome = store
        .upsert(organization_id, schema.table, &key_column, records)
        .await
        .map_err(|e| {
            log::error!("Upsert into {} failed: {:#}", schema.table, e);
            ImportError::Commit {
                table: schema.table.to_string(),
                reason: format!("{:#}", e),
            }
        })?;

    if outcome.failed_keys.is_empty() {
        return Ok(outcome.written);
    }

    if store.atomic_upsert() {
        // An atomic store should have failed the whole call instead
        log::error!(
            "Atomic store reported {} failed keys for {}",
            outcome.failed_keys.len(),
            schema.table
        );
        return Err(ImportError::Commit {
            table: schema.table.to_string(),
            reason: format!("rejected keys: {}", outcome.failed_keys.join(", ")),
        });
    }

    log::warn!(
        "Partial commit into {}: {} written, {} failed",
        schema.table,
        outcome.written,
        outcome.failed_keys.len()
    );
    Err(ImportError::PartialCommit {
        written: outcome.written,
        failed_keys: outcome.failed_keys,
    })
}

/// Re-fetch the whole entity list so callers hold exactly what the store has
pub async fn refresh(
    store: &dyn DataStore,
    schema: &TargetSchema,
    organization_id: &str,
) -> Result<Vec<ValidatedRecord>> {
    let records = store.fetch_all(organization_id, schema.table).await?;
    log::debug!("Refreshed {}: {} records", schema.table, records.len());
    Ok(records)
}
