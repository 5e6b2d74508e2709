// SQLite-backed key-value storage

use crate::storage::{STORE_DIR, Storage, validate_key};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key-value storage in a single SQLite table
pub struct SqliteStorage {
    base_path: PathBuf,
    db: Connection,
}

impl SqliteStorage {
    /// Open or create the database at `<path>/.todostore/todostore.db`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(STORE_DIR);

        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let db_path = base_path.join("todostore.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self { base_path, db };
        storage.create_schema()?;

        info!(path = ?db_path, "Opened SQLite storage");
        Ok(storage)
    }

    /// In-memory database, useful for tests
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let storage = Self {
            base_path: PathBuf::new(),
            db,
        };
        storage.create_schema()?;
        Ok(storage)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Timestamp of the last write to `key`, in milliseconds since epoch
    pub fn updated_at(&self, key: &str) -> Result<Option<i64>> {
        let updated_at = self
            .db
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(updated_at)
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, now_ms()],
            )
            .context("Failed to write key")?;

        debug!(key, bytes = value.len(), "Wrote storage row");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

// Helper function for timestamps
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sqlite_get_set_remove() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.get("todos").unwrap(), None);

        storage.set("todos", "[]").unwrap();
        assert_eq!(storage.get("todos").unwrap().as_deref(), Some("[]"));

        storage.set("todos", r#"[{"id":"a","text":"x"}]"#).unwrap();
        assert_eq!(
            storage.get("todos").unwrap().as_deref(),
            Some(r#"[{"id":"a","text":"x"}]"#)
        );

        storage.remove("todos").unwrap();
        assert_eq!(storage.get("todos").unwrap(), None);
    }

    #[test]
    fn test_sqlite_records_updated_at() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.updated_at("todos").unwrap(), None);

        let before = now_ms();
        storage.set("todos", "[]").unwrap();
        assert!(storage.updated_at("todos").unwrap().unwrap() >= before);
    }

    #[test]
    fn test_sqlite_rejects_invalid_key() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.set("", "[]").is_err());
        assert!(storage.set("has space", "[]").is_err());
    }

    #[test]
    fn test_sqlite_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut storage = SqliteStorage::open(temp.path()).unwrap();
            storage.set("todosByDate", "{}").unwrap();
        }

        let storage = SqliteStorage::open(temp.path()).unwrap();
        assert!(storage.base_path().join("todostore.db").exists());
        assert_eq!(storage.get("todosByDate").unwrap().as_deref(), Some("{}"));
    }
}
