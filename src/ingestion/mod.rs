//! Bulk Ingestion Module
//!
//! Handles the multi-record create path driven by an uploaded file.
//!
//! ## Workflow
//! 1. **Parse**: `parser` dispatches on the upload's file extension and decodes
//!    the byte stream into candidate records (JSON array or 4-column CSV).
//! 2. **Validate**: `pipeline` rejects an empty candidate batch before touching
//!    the store.
//! 3. **Persist**: the batch is written in one all-or-nothing transaction.
//! 4. **Diagnose**: on a duplicate-key conflict, each candidate is re-checked
//!    individually so the caller learns exactly which records collided.

pub mod parser;
pub mod pipeline;
