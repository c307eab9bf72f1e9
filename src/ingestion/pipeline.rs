//! Bulk Ingest Pipeline
//!
//! Takes the parser's candidate sequence and attempts a durable bulk write
//! with actionable conflict reporting.

use thiserror::Error;

use super::parser::ParseError;
use crate::records::types::Employee;
use crate::storage::{RecordStore, StoreError};

/// Failures of the bulk ingest path.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload decoded to zero candidates.
    #[error("uploaded file contains no records")]
    EmptyBatch,
    /// The bulk write collided; the payload is the subset of candidates whose
    /// names were already persisted.
    #[error("{} uploaded records already exist", .0.len())]
    Conflicts(Vec<Employee>),
    /// The upload could not be decoded at all.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Store fault other than a recognized duplicate key. Not masked.
    #[error(transparent)]
    Store(StoreError),
}

/// Attempts the all-or-nothing bulk write of `candidates`.
///
/// On a duplicate-key conflict the failed transaction persisted nothing, so a
/// read-only diagnostic pass re-checks each candidate individually and reports
/// the collided subset via [`IngestError::Conflicts`]. The pass never
/// re-attempts insertion.
pub fn ingest_batch<S: RecordStore>(store: &S, candidates: &[Employee]) -> Result<(), IngestError> {
    if candidates.is_empty() {
        return Err(IngestError::EmptyBatch);
    }

    match store.bulk_insert(candidates) {
        Ok(()) => {
            tracing::debug!("bulk insert persisted {} records", candidates.len());
            Ok(())
        }
        Err(StoreError::Conflict) => Err(IngestError::Conflicts(collect_conflicts(
            store, candidates,
        )?)),
        Err(err) => Err(IngestError::Store(err)),
    }
}

/// Re-checks each candidate, in input order, against the store.
///
/// The store does not report which rows of a failed bulk write collided, so
/// this O(n) pass reconstructs that information for the caller.
fn collect_conflicts<S: RecordStore>(
    store: &S,
    candidates: &[Employee],
) -> Result<Vec<Employee>, IngestError> {
    let mut conflicts = Vec::new();
    for candidate in candidates {
        if store.exists(&candidate.name).map_err(IngestError::Store)? {
            conflicts.push(candidate.clone());
        }
    }
    Ok(conflicts)
}
