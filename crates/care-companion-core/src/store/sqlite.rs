//! SQLite-backed key-value store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{KeyValueStore, StoreError, StoreResult, SCHEMA};

/// On-device store: one row per key in `kv_store`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open store at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Create in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock poisoned: {}", e)))
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn()?
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let rows_affected = self
            .conn()?
            .execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        debug!(key, removed = rows_affected > 0, "record removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_set_get_overwrite() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.set("tasks", r#"["a"]"#).unwrap();
        assert_eq!(store.get("tasks").unwrap(), Some(r#"["a"]"#.into()));

        store.set("tasks", r#"["a","b"]"#).unwrap();
        assert_eq!(store.get("tasks").unwrap(), Some(r#"["a","b"]"#.into()));
        assert_eq!(store.keys().unwrap(), vec!["tasks".to_string()]);
    }

    #[test]
    fn test_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("patientProfile", "{}").unwrap();

        store.remove("patientProfile").unwrap();
        assert_eq!(store.get("patientProfile").unwrap(), None);

        // Removing again is not an error
        assert!(store.remove("patientProfile").is_ok());
    }
}
