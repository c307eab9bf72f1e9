//! Record Storage Module
//!
//! Owns all persisted state of the service: a single `employees` table keyed
//! by `name`, behind the `RecordStore` contract.
//!
//! ## Core Concepts
//! - **Contract**: `RecordStore` exposes exactly what the API and ingest layers
//!   need (find-by-key, existence-check, paged scan, insert, bulk insert).
//! - **Uniqueness**: `name` is the primary key; duplicate inserts surface as
//!   `StoreError::Conflict`, detected by SQLite's constraint enforcement.
//! - **Bulk writes**: `bulk_insert` runs in one transaction. Either every
//!   candidate is persisted or none are.
//! - **Bootstrap**: opening a store applies versioned migrations tracked via
//!   `PRAGMA user_version` before any data access.

pub mod sqlite;


use thiserror::Error;

use crate::records::types::Employee;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write violated the `name` primary key.
    #[error("record with this name already exists")]
    Conflict,
    /// The store handle is no longer usable (a writer panicked mid-operation).
    #[error("record store is unavailable")]
    Unavailable,
    /// The database schema is newer than this binary supports.
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Any other SQLite-level failure. Not masked; callers map this to a
    /// server fault.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of records plus the metadata a client needs to keep paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Records in insertion order.
    pub records: Vec<Employee>,
    /// Total number of records in the store, not just this page.
    pub total: u64,
}

/// Persistence contract for employee records.
///
/// The service and ingest layers depend on this trait only; the SQLite
/// implementation lives in [`sqlite`].
pub trait RecordStore {
    /// Looks up one record by its unique name.
    fn find_by_name(&self, name: &str) -> StoreResult<Option<Employee>>;

    /// Returns whether a record with this name is already persisted.
    ///
    /// Used by the ingest pipeline to diagnose which candidates of a failed
    /// bulk write collided.
    fn exists(&self, name: &str) -> StoreResult<bool>;

    /// Returns the given 1-based page of records in insertion order, with the
    /// total record count.
    fn page(&self, page: u32, page_size: u32) -> StoreResult<RecordPage>;

    /// Inserts one record. Fails with [`StoreError::Conflict`] if the name is
    /// already taken.
    fn insert(&self, employee: &Employee) -> StoreResult<()>;

    /// Inserts all records in a single transaction.
    ///
    /// All-or-nothing: on [`StoreError::Conflict`] (or any other failure)
    /// nothing was persisted.
    fn bulk_insert(&self, employees: &[Employee]) -> StoreResult<()>;
}
