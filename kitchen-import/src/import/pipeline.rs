//! Import pipeline: context threaded through every stage
//!
//! [`ImportPipeline::prepare`] reads, filters, maps, resolves and
//! de-duplicates without writing anything; dropping the returned
//! [`PreparedBatch`] cancels the import. [`ImportPipeline::commit`] performs
//! the single upsert and the refresh.

use crate::import::commit::{commit_batch, refresh};
use crate::import::dedup::dedup;
use crate::import::filter::filter_for_schema;
use crate::import::map::map_row;
use crate::import::resolve::{build_lookup_index, resolve_references};
use crate::import::{
    CommitOutcome, ImportError, ImportResult, ImportTarget, ReferenceMiss, RejectedRow,
    SourceFile, TargetSchema, ValidatedRecord, read_rows,
};
use crate::store::DataStore;

/// Per-run switches
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Reject rows with unparseable numbers instead of defaulting them
    pub strict_numbers: bool,
    /// Field delimiter for delimited text
    pub delimiter: u8,
    /// Stop after preparing; nothing is sent to the store
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            strict_numbers: false,
            delimiter: b',',
            dry_run: false,
        }
    }
}

impl ImportOptions {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_numbers = strict;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Validated batch, not yet written
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub source_name: String,
    pub rows_read: usize,
    /// De-duplicated records in spreadsheet order
    pub records: Vec<ValidatedRecord>,
    /// Skipped rows, sorted by row number
    pub rejected: Vec<RejectedRow>,
    pub unresolved: Vec<ReferenceMiss>,
}

pub struct ImportPipeline {
    schema: &'static TargetSchema,
    organization_id: String,
    options: ImportOptions,
}

impl ImportPipeline {
    pub fn new(
        target: ImportTarget,
        organization_id: impl Into<String>,
        options: ImportOptions,
    ) -> Self {
        ImportPipeline {
            schema: target.schema(),
            organization_id: organization_id.into(),
            options,
        }
    }

    pub fn schema(&self) -> &'static TargetSchema {
        self.schema
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Run every stage up to, but not including, the commit
    pub async fn prepare(
        &self,
        store: &dyn DataStore,
        source: &SourceFile,
        sheet: Option<&str>,
    ) -> Result<PreparedBatch, ImportError> {
        let schema = self.schema;

        let rows = read_rows(source, schema, sheet, self.options.delimiter)?;
        let rows_read = rows.len();

        let filtered = filter_for_schema(rows, schema);
        let mut rejected = filtered.dropped;
        if filtered.kept.is_empty() {
            log::warn!("{}: no rows with both identity fields", source.name);
            return Err(ImportError::EmptyData {
                source_name: source.name.clone(),
            });
        }

        let mut records = Vec::with_capacity(filtered.kept.len());
        for row in &filtered.kept {
            match map_row(row, schema, &self.organization_id, self.options.strict_numbers) {
                Ok(record) => records.push(record),
                Err(reject) => {
                    log::warn!("Row {} rejected: {}", reject.row_number, reject.reason);
                    rejected.push(reject);
                }
            }
        }
        if records.is_empty() {
            return Err(ImportError::EmptyData {
                source_name: source.name.clone(),
            });
        }

        // Resolve after dedup: misses must match the records written
        let (mut records, duplicates) = dedup(records);
        rejected.extend(duplicates);
        rejected.sort_by_key(|r| r.row_number);

        let mut unresolved = Vec::new();
        if schema.reference_fields().next().is_some() {
            let index = build_lookup_index(store, &self.organization_id, schema).await?;
            for record in &mut records {
                unresolved.extend(resolve_references(record, schema, &index));
            }
        }

        log::info!(
            "Prepared {} for {}: {} read, {} accepted, {} skipped, {} unresolved links",
            source.name,
            schema.target,
            rows_read,
            records.len(),
            rejected.len(),
            unresolved.len()
        );

        Ok(PreparedBatch {
            source_name: source.name.clone(),
            rows_read,
            records,
            rejected,
            unresolved,
        })
    }

    /// Write a prepared batch and refresh
    ///
    /// Commit failures are reported on the result's outcome; use
    /// [`ImportResult::check`] to turn them into errors.
    pub async fn commit(&self, store: &dyn DataStore, batch: PreparedBatch) -> ImportResult {
        let schema = self.schema;
        let accepted = batch.records.len();

        let outcome = if self.options.dry_run {
            log::info!("Dry run: {} records not written", accepted);
            CommitOutcome::Skipped
        } else {
            match commit_batch(store, schema, &self.organization_id, &batch.records).await {
                Ok(written) => CommitOutcome::Success { written },
                Err(ImportError::PartialCommit {
                    written,
                    failed_keys,
                }) => CommitOutcome::Partial {
                    written,
                    failed_keys,
                },
                Err(e) => CommitOutcome::Failure {
                    reason: e.to_string(),
                },
            }
        };

        let refreshed = match outcome {
            CommitOutcome::Success { .. } | CommitOutcome::Partial { .. } => {
                match refresh(store, schema, &self.organization_id).await {
                    Ok(records) => Some(records.len()),
                    Err(e) => {
                        log::warn!("Refresh of {} failed: {:#}", schema.table, e);
                        None
                    }
                }
            }
            CommitOutcome::Failure { .. } | CommitOutcome::Skipped => None,
        };

        ImportResult {
            target: schema.target,
            rows_read: batch.rows_read,
            accepted,
            rejected: batch.rejected,
            unresolved: batch.unresolved,
            outcome,
            refreshed,
        }
    }

    /// Prepare and commit in one go
    pub async fn run(
        &self,
        store: &dyn DataStore,
        source: &SourceFile,
        sheet: Option<&str>,
    ) -> Result<ImportResult, ImportError> {
        let batch = self.prepare(store, source, sheet).await?;
        Ok(self.commit(store, batch).await)
    }
}
