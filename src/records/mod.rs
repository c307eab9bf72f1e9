//! Record Service Module
//!
//! The HTTP API layer. Exposes the list/get/create surface over the record
//! store and orchestrates Parser → Pipeline → Store for file uploads.
//!
//! ## Endpoints (under `/api/employees`)
//! - `GET /` — paginated listing with total-count metadata.
//! - `GET /:name` — fetch one record by its unique name.
//! - `POST /` — create one record from a JSON body.
//! - `POST /text` — placeholder accept-and-discard endpoint.
//! - `POST /file` — bulk create from an uploaded JSON or CSV file.
//!
//! Records are create-only: there is no update or delete surface by design.

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;
