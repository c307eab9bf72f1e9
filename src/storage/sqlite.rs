use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode};

use super::{RecordPage, RecordStore, StoreError, StoreResult};
use crate::records::types::Employee;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "CREATE TABLE employees (
              name   TEXT PRIMARY KEY NOT NULL,
              email  TEXT,
              tel    TEXT,
              joined TEXT
          );",
}];

const SELECT_COLUMNS: &str = "SELECT name, email, tel, joined FROM employees";

/// SQLite-backed implementation of [`RecordStore`].
///
/// Holds a single connection behind a mutex; handlers share the store via
/// `Arc` and hold the lock only for the duration of one statement batch.
pub struct SqliteRecordStore {
    pub(crate) conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore").finish_non_exhaustive()
    }
}

impl SqliteRecordStore {
    /// Opens (or creates) the database file and applies pending migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let mut conn = Connection::open(path)?;
        bootstrap(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a fresh in-memory database. Used by tests and `--db :memory:`.
    pub fn open_in_memory() -> StoreResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        bootstrap(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Checks that the store handle is still usable without touching any rows.
    pub fn ensure_available(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Unavailable)
    }
}

impl RecordStore for SqliteRecordStore {
    fn find_by_name(&self, name: &str) -> StoreResult<Option<Employee>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_employee(row)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        let conn = self.lock()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE name = ?1;",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn page(&self, page: u32, page_size: u32) -> StoreResult<RecordPage> {
        let conn = self.lock()?;
        let total: u64 = conn.query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;

        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        let mut stmt =
            conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid LIMIT ?1 OFFSET ?2;"))?;
        let mut rows = stmt.query(params![page_size, offset])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_employee(row)?);
        }

        Ok(RecordPage { records, total })
    }

    fn insert(&self, employee: &Employee) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO employees (name, email, tel, joined) VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.name,
                employee.email,
                employee.tel,
                employee.joined
            ],
        )
        .map_err(map_insert_error)?;
        Ok(())
    }

    fn bulk_insert(&self, employees: &[Employee]) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO employees (name, email, tel, joined) VALUES (?1, ?2, ?3, ?4);",
            )?;
            for employee in employees {
                stmt.execute(params![
                    employee.name,
                    employee.email,
                    employee.tel,
                    employee.joined
                ])
                .map_err(map_insert_error)?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn row_to_employee(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        name: row.get("name")?,
        email: row.get("email")?,
        tel: row.get("tel")?,
        joined: row.get("joined")?,
    })
}

fn map_insert_error(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict
        }
        _ => StoreError::Sqlite(err),
    }
}

fn bootstrap(conn: &mut Connection) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    apply_migrations(conn)
}

/// Applies all pending migrations on the provided connection.
///
/// The applied version is mirrored to `PRAGMA user_version`; a database that
/// reports a newer version than this binary knows is rejected.
fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = MIGRATIONS.last().map_or(0, |migration| migration.version);

    if current > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    tracing::debug!("applied schema migrations up to version {}", latest);
    Ok(())
}
