//! SQLite connection handle shared by all services

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use shared::{ProcessId, process_debug};

use crate::config::DatabaseLocation;
use crate::error::{WebServerError, WebServerResult};
use crate::storage::schema;

/// Cloneable handle to the single SQLite connection.
///
/// Every operation runs on tokio's blocking pool with the connection locked,
/// so one closure passed to [`Database::call`] is one serialized unit of work.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) and migrate the database at `location`
    pub fn open(location: &DatabaseLocation) -> WebServerResult<Self> {
        let conn = match location {
            DatabaseLocation::InMemory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = Connection::open(path)?;
                conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
                conn
            }
        };
        Self::configure(conn)
    }

    /// Fresh in-memory database, mostly for tests
    pub fn open_in_memory() -> WebServerResult<Self> {
        Self::open(&DatabaseLocation::InMemory)
    }

    fn configure(conn: Connection) -> WebServerResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute("PRAGMA foreign_keys=ON;", [])?;
        register_functions(&conn)?;
        schema::migrate(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `op` against the connection on the blocking pool
    pub async fn call<F, T>(&self, label: &'static str, op: F) -> WebServerResult<T>
    where
        F: FnOnce(&mut Connection) -> WebServerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        process_debug!(ProcessId::current(), "🗄️ db {}", label);

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| WebServerError::InternalError("database lock poisoned".to_string()))?;
            op(&mut guard)
        })
        .await
        .map_err(|e| WebServerError::TaskJoin(format!("{label}: {e}")))?
    }
}

/// SQL name of the Unicode-aware lowercase function.
///
/// SQLite's built-in `lower()` only folds ASCII, so case-insensitive matching
/// goes through this instead, with Rust's `to_lowercase` on both sides.
pub const FOLD_CASE: &str = "fold_case";

fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_has_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let enabled: i64 = db
            .call("pragma", |conn| {
                Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_fold_case_lowers_non_ascii_text() {
        let db = Database::open_in_memory().unwrap();
        let folded: (String, Option<String>) = db
            .call("fold_case", |conn| {
                Ok(conn.query_row("SELECT fold_case('ÉCOLE Ärger'), fold_case(NULL)", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?)
            })
            .await
            .unwrap();
        assert_eq!(folded, ("école ärger".to_string(), None));
    }

    #[tokio::test]
    async fn test_file_database_is_created_and_reopened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("portal.db");
        let location = DatabaseLocation::File(path.clone());

        let db = Database::open(&location).unwrap();
        db.call("insert", |conn| {
            conn.execute("INSERT OR IGNORE INTO roles (name) VALUES ('Admin')", [])?;
            Ok(())
        })
        .await
        .unwrap();
        drop(db);

        assert!(path.exists());
        let reopened = Database::open(&location).unwrap();
        let roles: i64 = reopened
            .call("count", |conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM roles", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(roles, 3);
    }
}
