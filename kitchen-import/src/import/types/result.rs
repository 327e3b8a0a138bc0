//! Diagnostics and the end-of-run summary

use super::schema::ImportTarget;

/// Why a row was left out of the batch
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// An identity field was blank or the placeholder "0"
    MissingIdentity { field: String },
    /// Natural key already seen earlier in the batch
    Duplicate { key: String, first_row: Option<usize> },
    /// Unparseable numeric cell (strict mode only)
    InvalidNumber { field: String, raw: String },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingIdentity { field } => write!(f, "missing {}", field),
            RejectReason::Duplicate { key, first_row } => match first_row {
                Some(row) => write!(f, "duplicate of '{}' (first seen on row {})", key, row),
                None => write!(f, "duplicate of '{}'", key),
            },
            RejectReason::InvalidNumber { field, raw } => {
                write!(f, "'{}' is not a valid number for {}", raw, field)
            }
        }
    }
}

/// A row that did not make it into the committed batch
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub row_number: usize,
    pub reason: RejectReason,
}

/// A display name that matched nothing in its lookup table
///
/// Soft: the field is nulled and the record is still committed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMiss {
    pub row_number: Option<usize>,
    pub natural_key: String,
    pub field: String,
    pub table: String,
    pub value: String,
}

impl std::fmt::Display for ReferenceMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} '{}' not found in {}",
            self.natural_key, self.field, self.value, self.table
        )
    }
}

/// What happened to the commit call
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Every record was written
    Success { written: usize },
    /// Non-atomic store applied only part of the batch
    Partial {
        written: usize,
        failed_keys: Vec<String>,
    },
    /// The upsert call failed; nothing is considered written
    Failure { reason: String },
    /// Dry run, nothing was sent
    Skipped,
}

/// Summary of one import run
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub target: ImportTarget,
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected: Vec<RejectedRow>,
    pub unresolved: Vec<ReferenceMiss>,
    pub outcome: CommitOutcome,
    /// Records held by the store after the post-commit refresh
    pub refreshed: Option<usize>,
}

impl ImportResult {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CommitOutcome::Success { .. } | CommitOutcome::Skipped)
    }

    /// Surface a failed or partial commit as an error
    pub fn check(&self) -> Result<&Self, crate::import::ImportError> {
        match &self.outcome {
            CommitOutcome::Failure { reason } => Err(crate::import::ImportError::Commit {
                table: self.target.schema().table.to_string(),
                reason: reason.clone(),
            }),
            CommitOutcome::Partial {
                written,
                failed_keys,
            } => Err(crate::import::ImportError::PartialCommit {
                written: *written,
                failed_keys: failed_keys.clone(),
            }),
            CommitOutcome::Success { .. } | CommitOutcome::Skipped => Ok(self),
        }
    }

    /// One-line, user-facing summary
    pub fn summary(&self) -> String {
        let mut line = match &self.outcome {
            CommitOutcome::Success { written } => format!(
                "{} of {} rows imported into {}",
                written, self.rows_read, self.target
            ),
            CommitOutcome::Partial {
                written,
                failed_keys,
            } => format!(
                "{} of {} rows imported into {}, {} failed",
                written,
                self.rows_read,
                self.target,
                failed_keys.len()
            ),
            CommitOutcome::Failure { reason } => {
                format!("Import into {} failed: {}", self.target, reason)
            }
            CommitOutcome::Skipped => format!(
                "{} of {} rows ready for {} (dry run)",
                self.accepted, self.rows_read, self.target
            ),
        };
        if !self.rejected.is_empty() {
            line.push_str(&format!(", {} rows skipped", self.rejected.len()));
        }
        if !self.unresolved.is_empty() {
            line.push_str(&format!(
                ", {} category links could not be resolved",
                self.unresolved.len()
            ));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: CommitOutcome) -> ImportResult {
        ImportResult {
            target: ImportTarget::MasterIngredient,
            rows_read: 3,
            accepted: 2,
            rejected: vec![RejectedRow {
                row_number: 4,
                reason: RejectReason::MissingIdentity {
                    field: "Item Code".into(),
                },
            }],
            unresolved: vec![],
            outcome,
            refreshed: None,
        }
    }

    #[test]
    fn test_summary_mentions_unresolved_links() {
        let mut r = result(CommitOutcome::Success { written: 2 });
        r.unresolved.push(ReferenceMiss {
            row_number: Some(2),
            natural_key: "SNK-1".into(),
            field: "major_group".into(),
            table: "food_category_groups".into(),
            value: "Snacks".into(),
        });
        assert_eq!(
            r.summary(),
            "2 of 3 rows imported into master-ingredients, 1 rows skipped, 1 category links could not be resolved"
        );
    }

    #[test]
    fn test_check_maps_partial_to_error() {
        let r = result(CommitOutcome::Partial {
            written: 1,
            failed_keys: vec!["BEEF-002".into()],
        });
        let err = r.check().unwrap_err();
        assert!(matches!(
            err,
            crate::import::ImportError::PartialCommit { written: 1, .. }
        ));
        assert!(result(CommitOutcome::Skipped).check().is_ok());
    }
}
