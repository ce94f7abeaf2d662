//! Persistence for committee state.
//!
//! Every top-level piece of state lives in its own slot: a string key
//! holding one JSON value. The host supplies the raw string store
//! ([`KeyValueStore`]); [`Slots`] adds typed reads and writes on top.
//!
//! Reads never fail: a missing key or a value that no longer parses
//! yields the caller's default. Writes never fail either: errors are
//! logged and the in-memory state stays the source of truth.

mod memory;
mod sqlite;

use log::warn;
use serde::{Serialize, de::DeserializeOwned};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur talking to a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// A string-keyed store of string values, provided by the host.
pub trait KeyValueStore {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Idempotent.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Typed, infallible access to JSON slots of a [`KeyValueStore`].
///
/// Blanket-implemented for every store.
pub trait Slots: KeyValueStore {
    /// Reads the slot at `key`, falling back to `default` when the key is
    /// absent, unreadable, or holds something that does not parse as `T`.
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("discarding malformed value for {key}: {e}");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!("failed to read {key}: {e}");
                default
            }
        }
    }

    /// Writes `value` to the slot at `key`. Failures are logged, not returned.
    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let written = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|json| self.set(key, &json));
        if let Err(e) = written {
            warn!("failed to persist {key}: {e}");
        }
    }

    /// Removes the slot at `key`. Failures are logged, not returned.
    fn clear(&mut self, key: &str) {
        if let Err(e) = self.remove(key) {
            warn!("failed to clear {key}: {e}");
        }
    }
}

impl<S: KeyValueStore + ?Sized> Slots for S {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    /// A store whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    #[test]
    fn load_missing_key_returns_default() {
        let store = MemoryStore::new();
        assert_eq!(store.load("missing", 7_u32), 7);
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let mut map = BTreeMap::new();
        map.insert("anciao".to_string(), 6_u32);

        store.save("overrides", &map);

        assert_eq!(store.load("overrides", BTreeMap::new()), map);
        assert_eq!(store.get("overrides").unwrap().unwrap(), r#"{"anciao":6}"#);
    }

    #[test]
    fn malformed_value_returns_default() {
        let mut store = MemoryStore::new();
        store.set("stage", "{not json").unwrap();

        assert_eq!(store.load("stage", String::from("fallback")), "fallback");
    }

    #[test]
    fn wrong_shape_returns_default() {
        let mut store = MemoryStore::new();
        store.set("count", r#""seven""#).unwrap();

        assert_eq!(store.load("count", 3_u32), 3);
    }

    #[test]
    fn broken_backend_is_swallowed() {
        let mut store = BrokenStore;

        store.save("anything", &1_u32);
        store.clear("anything");

        assert_eq!(store.load("anything", 9_u32), 9);
    }

    #[test]
    fn clear_removes_slot() {
        let mut store = MemoryStore::new();
        store.save("name", "Central Church");
        store.clear("name");

        assert!(store.get("name").unwrap().is_none());
    }
}
