//! Record API Data Types
//!
//! Defines the employee entity and the Data Transfer Objects (DTOs) used by
//! the HTTP layer. Multi-word wire fields are camelCase, matching the JSON
//! conventions of the service's clients.

use serde::{Deserialize, Serialize};

/// One employee record.
///
/// `name` uniquely identifies a record and is required on the wire; every
/// other attribute is optional free text (`joined` is a date stored as-is,
/// never parsed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub joined: Option<String>,
}

/// Query parameters for the paginated listing endpoint.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

/// Response envelope for one page of the listing.
///
/// Carries enough metadata (`total`, `totalPages`) for a client to page
/// through the full record set. Constructed per request, never persisted.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub records: Vec<Employee>,
}

/// Standard body for every client- and server-fault response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure body for a bulk upload whose batch collided with existing records.
///
/// `conflicts` is exactly the subset of uploaded candidates whose names were
/// already taken; nothing from the batch was persisted.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkConflictResponse {
    pub error: String,
    pub conflicts: Vec<Employee>,
}
