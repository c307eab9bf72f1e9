//! Record Service Tests
//!
//! Exercises the HTTP handlers directly with constructed extractors and an
//! in-memory store.
//!
//! ## Test Scopes
//! - **Listing**: pagination envelope, clamping of non-positive parameters.
//! - **Fetch/Create**: status codes, Location header, conflict handling.
//! - **Ingest mapping**: every bulk-ingest failure to its HTTP response.
//!
//! *Note: the multipart extractor cannot be constructed outside a request, so
//! the upload handler's decode and persistence behavior is covered by the
//! ingestion module tests plus the response-mapping tests here.*

#[cfg(test)]
mod tests {
    use crate::ingestion::parser::ParseError;
    use crate::ingestion::pipeline::IngestError;
    use crate::records::handlers::{
        handle_create_employee, handle_create_from_text, handle_get_employee,
        handle_list_employees, ingest_failure_response, BASE_PATH,
    };
    use crate::records::types::{Employee, PageParams, PageResponse};
    use crate::storage::sqlite::SqliteRecordStore;
    use crate::storage::RecordStore;
    use axum::extract::{Extension, Path, Query};
    use axum::http::{header, StatusCode};
    use axum::response::Response;
    use axum::Json;
    use std::sync::Arc;

    fn employee(name: &str) -> Employee {
        Employee {
            name: name.to_string(),
            email: Some(format!("{name}@example.com")),
            tel: None,
            joined: Some("2024-03-01".to_string()),
        }
    }

    fn seeded_store(count: usize) -> Arc<SqliteRecordStore> {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        for i in 0..count {
            store.insert(&employee(&format!("emp-{i}"))).unwrap();
        }
        Arc::new(store)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ============================================================
    // LISTING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_list_returns_requested_page_with_total() {
        let store = seeded_store(5);

        let response = handle_list_employees(
            Extension(store),
            Query(PageParams {
                page: Some(1),
                page_size: Some(2),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let page: PageResponse = body_json(response).await;
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records[0].name, "emp-0");
        assert_eq!(page.records[1].name, "emp-1");
    }

    #[tokio::test]
    async fn test_list_clamps_non_positive_paging() {
        let store = seeded_store(3);

        let response = handle_list_employees(
            Extension(store),
            Query(PageParams {
                page: Some(0),
                page_size: Some(0),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let page: PageResponse = body_json(response).await;
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 25);
        assert_eq!(page.records.len(), 3);
    }

    #[tokio::test]
    async fn test_list_on_unavailable_store_is_404() {
        let store = seeded_store(0);
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.conn.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        let response = handle_list_employees(
            Extension(store),
            Query(PageParams {
                page: None,
                page_size: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ============================================================
    // FETCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_get_returns_record() {
        let store = seeded_store(0);
        let record = employee("jane");
        store.insert(&record).unwrap();

        let response =
            handle_get_employee(Extension(store), Path("jane".to_string())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Employee = body_json(response).await;
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_get_missing_record_is_404() {
        let store = seeded_store(0);

        let response =
            handle_get_employee(Extension(store), Path("nobody".to_string())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ============================================================
    // CREATE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_create_returns_201_with_location_and_persists() {
        let store = seeded_store(0);
        let record = employee("jane");

        let response =
            handle_create_employee(Extension(store.clone()), Json(record.clone())).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            &format!("{BASE_PATH}/jane")
        );
        let created: Employee = body_json(response).await;
        assert_eq!(created, record);
        assert_eq!(store.find_by_name("jane").unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_409() {
        let store = seeded_store(0);
        store.insert(&employee("jane")).unwrap();

        // A different joined date does not make the name available again.
        let mut duplicate = employee("jane");
        duplicate.joined = Some("2030-12-31".to_string());

        let response = handle_create_employee(Extension(store), Json(duplicate)).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_empty_name_is_400() {
        let store = seeded_store(0);
        let record = Employee {
            name: "   ".to_string(),
            email: None,
            tel: None,
            joined: None,
        };

        let response = handle_create_employee(Extension(store), Json(record)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_text_create_accepts_and_discards() {
        let store = seeded_store(0);

        let response = handle_create_from_text(
            Extension(store.clone()),
            "jane,jane@example.com,555-0101,2024-03-01".to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        // Placeholder endpoint: nothing was persisted.
        assert_eq!(store.page(1, 10).unwrap().total, 0);
    }

    // ============================================================
    // INGEST FAILURE MAPPING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_empty_batch_maps_to_400() {
        let response = ingest_failure_response(IngestError::EmptyBatch);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_parse_failures_map_to_400() {
        for err in [
            ParseError::MissingExtension,
            ParseError::UnsupportedFormat("txt".to_string()),
            ParseError::MalformedPayload("uploaded file is empty".to_string()),
        ] {
            let response = ingest_failure_response(IngestError::Parse(err));
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_conflict_batch_maps_to_400_with_subset() {
        let response =
            ingest_failure_response(IngestError::Conflicts(vec![employee("bob")]));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["conflicts"][0]["name"], "bob");
        assert!(body["error"].is_string());
    }
}
