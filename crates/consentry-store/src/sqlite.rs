//! SQLite-backed storage, the durable analog of browser local storage.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use consentry_core::{Error, Result};

use crate::backend::StorageBackend;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS consent_kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);";

/// Single-table key-value store on SQLite.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteBackend {
    /// Open or create the backing database.
    ///
    /// `db_dir` is the directory (e.g., `data/`). The file will be
    /// `db_dir/consent.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Persistence(e.to_string()))?;
        let db_path = db_dir.join("consent.db");

        let conn = Self::create_connection(&db_path)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Persistence(format!("Schema init failed: {}", e)))?;

        info!("SqliteBackend initialized: path={}", db_path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn =
            Connection::open(db_path).map_err(|e| Error::Persistence(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Persistence(e.to_string()))?;
        Ok(conn)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl StorageBackend for SqliteBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .prepare_cached("SELECT value FROM consent_kv WHERE key = ?1")
            .map_err(|e| Error::Persistence(e.to_string()))?
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()
            .map_err(|e| Error::Persistence(e.to_string()))?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO consent_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .map_err(|e| Error::Persistence(e.to_string()))?
        .execute(params![key, value])
        .map_err(|e| Error::Persistence(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached("DELETE FROM consent_kv WHERE key = ?1")
            .map_err(|e| Error::Persistence(e.to_string()))?
            .execute(params![key])
            .map_err(|e| Error::Persistence(e.to_string()))?;
        Ok(())
    }
}
