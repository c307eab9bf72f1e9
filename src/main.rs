use axum::{
    routing::{get, post},
    Extension, Router,
};
use employee_registry::records::handlers::{
    handle_create_employee, handle_create_from_text, handle_get_employee, handle_list_employees,
    handle_upload_employees, BASE_PATH,
};
use employee_registry::storage::sqlite::SqliteRecordStore;
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_DB_PATH: &str = "employees.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: Option<SocketAddr> = None;
    let mut db_path = DEFAULT_DB_PATH.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--db" => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let Some(bind_addr) = bind_addr else {
        eprintln!("Usage: {} --bind <addr:port> [--db <path>]", args[0]);
        eprintln!("Example: {} --bind 127.0.0.1:8080", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:8080 --db records.db",
            args[0]
        );
        std::process::exit(1);
    };

    // 1. Storage layer: open the database and apply pending migrations.
    let store = if db_path == ":memory:" {
        SqliteRecordStore::open_in_memory()?
    } else {
        SqliteRecordStore::open(&db_path)?
    };
    let store = Arc::new(store);
    tracing::info!("Record store ready at {}", db_path);

    // 2. HTTP Router:
    let app = Router::new()
        .route(
            BASE_PATH,
            get(handle_list_employees).post(handle_create_employee),
        )
        .route(&format!("{BASE_PATH}/text"), post(handle_create_from_text))
        .route(&format!("{BASE_PATH}/file"), post(handle_upload_employees))
        .route(&format!("{BASE_PATH}/:name"), get(handle_get_employee))
        .layer(Extension(store));

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
