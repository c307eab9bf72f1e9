use axum::extract::{Extension, Multipart, Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use super::types::{BulkConflictResponse, Employee, ErrorResponse, PageParams, PageResponse};
use crate::ingestion::parser::parse_upload;
use crate::ingestion::pipeline::{ingest_batch, IngestError};
use crate::storage::sqlite::SqliteRecordStore;
use crate::storage::{RecordStore, StoreError};

/// Base route the record endpoints are mounted under.
pub const BASE_PATH: &str = "/api/employees";

const DEFAULT_PAGE_SIZE: u32 = 25;
const MAX_PAGE_SIZE: u32 = 100;

/// `GET /api/employees` — one page of records in insertion order.
///
/// `page` is 1-based and clamps to 1; a missing or zero `pageSize` falls back
/// to the default and is capped at [`MAX_PAGE_SIZE`].
pub async fn handle_list_employees(
    Extension(store): Extension<Arc<SqliteRecordStore>>,
    Query(params): Query<PageParams>,
) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = match params.page_size {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(size) => size.min(MAX_PAGE_SIZE),
    };

    match store.page(page, page_size) {
        Ok(record_page) => {
            let total_pages = record_page.total.div_ceil(u64::from(page_size));
            (
                StatusCode::OK,
                Json(PageResponse {
                    page,
                    page_size,
                    total: record_page.total,
                    total_pages,
                    records: record_page.records,
                }),
            )
                .into_response()
        }
        // Reads against a missing store answer not-found, never a server fault.
        Err(StoreError::Unavailable) => not_found("record store is unavailable"),
        Err(err) => server_fault(err),
    }
}

/// `GET /api/employees/:name` — fetch one record by its unique name.
pub async fn handle_get_employee(
    Extension(store): Extension<Arc<SqliteRecordStore>>,
    Path(name): Path<String>,
) -> Response {
    match store.find_by_name(&name) {
        Ok(Some(employee)) => (StatusCode::OK, Json(employee)).into_response(),
        Ok(None) => not_found(&format!("no record named {name}")),
        Err(StoreError::Unavailable) => not_found("record store is unavailable"),
        Err(err) => server_fault(err),
    }
}

/// `POST /api/employees` — create one record from a JSON body.
///
/// Answers 201 with a Location header pointing at the new record's fetch
/// route, 409 when the name is already taken. Store faults other than a
/// duplicate key surface as 500, never swallowed.
pub async fn handle_create_employee(
    Extension(store): Extension<Arc<SqliteRecordStore>>,
    Json(employee): Json<Employee>,
) -> Response {
    if employee.name.trim().is_empty() {
        return bad_request("record name must not be empty");
    }

    match store.insert(&employee) {
        Ok(()) => {
            tracing::debug!("created record {}", employee.name);
            (
                StatusCode::CREATED,
                [(header::LOCATION, format!("{BASE_PATH}/{}", employee.name))],
                Json(employee),
            )
                .into_response()
        }
        Err(StoreError::Conflict) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("record named {} already exists", employee.name),
            }),
        )
            .into_response(),
        Err(err) => server_fault(err),
    }
}

/// `POST /api/employees/text` — accept-and-discard placeholder.
///
/// Not yet implemented: the body is read and dropped without parsing or
/// persistence. Only the store's availability is checked, so a misconfigured
/// deployment still fails loudly.
pub async fn handle_create_from_text(
    Extension(store): Extension<Arc<SqliteRecordStore>>,
    body: String,
) -> Response {
    if let Err(err) = store.ensure_available() {
        return server_fault(err);
    }

    tracing::debug!("accepted {} bytes of text without persisting", body.len());
    StatusCode::CREATED.into_response()
}

/// `POST /api/employees/file` — bulk create from an uploaded JSON or CSV file.
///
/// Reads the first file part of the multipart body, decodes it via the
/// ingestion parser, and hands the candidates to the bulk pipeline. Every
/// ingest failure is a client error with a readable message; a duplicate-key
/// batch additionally carries the colliding subset.
pub async fn handle_upload_employees(
    Extension(store): Extension<Arc<SqliteRecordStore>>,
    mut multipart: Multipart,
) -> Response {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return bad_request("upload is missing a file part"),
        Err(err) => return bad_request(&format!("invalid multipart payload: {err}")),
    };

    let filename = match field.file_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return bad_request("upload is missing a filename"),
    };

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return bad_request(&format!("failed to read upload: {err}")),
    };

    let outcome = parse_upload(&bytes, &filename)
        .map_err(IngestError::from)
        .and_then(|candidates| ingest_batch(store.as_ref(), &candidates));

    match outcome {
        // Bulk creation has no single identifying resource, so the success
        // carries only the collection location and no body.
        Ok(()) => {
            (StatusCode::CREATED, [(header::LOCATION, BASE_PATH)]).into_response()
        }
        Err(err) => ingest_failure_response(err),
    }
}

/// Maps a bulk-ingest failure to its HTTP response.
pub(crate) fn ingest_failure_response(err: IngestError) -> Response {
    let message = err.to_string();
    match err {
        IngestError::Conflicts(conflicts) => (
            StatusCode::BAD_REQUEST,
            Json(BulkConflictResponse {
                error: message,
                conflicts,
            }),
        )
            .into_response(),
        IngestError::EmptyBatch | IngestError::Parse(_) => bad_request(&message),
        IngestError::Store(store_err) => server_fault(store_err),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn server_fault(err: impl std::fmt::Display) -> Response {
    tracing::error!("store fault: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
