//! Employee Registry Service Library
//!
//! This library crate defines the core modules of the record-management service.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of three loosely coupled subsystems:
//!
//! - **`storage`**: The persistence layer. Defines the `RecordStore` contract
//!   (find, existence-check, paged scan, insert, transactional bulk insert) and
//!   its SQLite implementation with versioned schema migrations.
//! - **`ingestion`**: The bulk intake pipeline. Decodes uploaded JSON/CSV payloads
//!   into candidate records and drives the all-or-nothing bulk write with
//!   duplicate-key conflict reporting.
//! - **`records`**: The HTTP API layer. Axum handlers for listing (paginated),
//!   fetching by name, and creating records singly or from an uploaded file.

pub mod ingestion;
pub mod records;
pub mod storage;
