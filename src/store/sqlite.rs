//! SQLite-backed store: one `kv` table in a single database file.
//!
//! ```text
//! <root>/committee.sqlite
//!   kv(key TEXT PRIMARY KEY, value TEXT NOT NULL)
//! ```

use std::{fs, path::Path};

use rusqlite::{Connection, OptionalExtension};

use super::{KeyValueStore, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Durable key-value storage in a local `SQLite` file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`.
    ///
    /// The parent directory is created if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::store::Slots;

    fn test_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("state").join("committee.sqlite")).unwrap();
        (dir, store)
    }

    #[test]
    fn get_missing_key() {
        let (_dir, store) = test_store();
        assert!(store.get("churchName").unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let (_dir, mut store) = test_store();
        store.set("churchName", r#""Central""#).unwrap();

        assert_eq!(store.get("churchName").unwrap().unwrap(), r#""Central""#);
    }

    #[test]
    fn set_overwrites() {
        let (_dir, mut store) = test_store();
        store.set("stage", r#""explanation""#).unwrap();
        store.set("stage", r#""voting""#).unwrap();

        assert_eq!(store.get("stage").unwrap().unwrap(), r#""voting""#);
    }

    #[test]
    fn remove_idempotent() {
        let (_dir, mut store) = test_store();
        store.set("stage", "1").unwrap();
        store.remove("stage").unwrap();
        store.remove("stage").unwrap();

        assert!(store.get("stage").unwrap().is_none());
    }

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("committee.sqlite");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save("selected", &vec!["anciao", "musica"]);
        }

        let store = SqliteStore::open(&path).unwrap();
        let selected: Vec<String> = store.load("selected", Vec::new());
        assert_eq!(selected, vec!["anciao".to_string(), "musica".to_string()]);
    }

    #[test]
    fn in_memory_store_works() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
