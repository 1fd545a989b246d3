//! SQLite-backed key-value store.
//!
//! All persisted state lives in one `kv` table of JSON-serialized values:
//! per-type timer settings, the bounded session history, the display name,
//! and the last acknowledged streak. Typed components
//! ([`super::SettingsStore`], [`super::SessionHistoryStore`]) sit on top of
//! this and share one handle via `Arc`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::StorageError;

/// Well-known keys in the kv store.
pub mod keys {
    pub const DISPLAY_NAME: &str = "displayName";
    pub const SESSION_SETTINGS: &str = "sessionSettings";
    pub const SESSION_HISTORY: &str = "sessionHistory";
    pub const LAST_ACKNOWLEDGED_STREAK: &str = "lastAcknowledgedStreak";
}

/// Persistent key-value store for application state.
///
/// The connection sits behind a mutex so one `Arc<Storage>` can serve the
/// settings and history stores at once; every operation is a single fast
/// local statement.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open the store at `~/.config/pomotriad/pomotriad.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(data_dir()?.join("pomotriad.db"))
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for tests and throwaway sessions).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-statement;
        // the connection itself is still usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a raw value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a raw value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get a JSON-serialized value. `Ok(None)` if the key is absent;
    /// `Err(StorageError::Corrupt)` if it exists but does not parse.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Store a value as JSON.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.kv_set(key, &raw)
    }

    /// The user's display name, if one was captured. Pure passthrough for
    /// the onboarding flow; a broken store reads as "not set".
    pub fn display_name(&self) -> Option<String> {
        match self.kv_get(keys::DISPLAY_NAME) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("failed to read display name: {e}");
                None
            }
        }
    }

    pub fn set_display_name(&self, name: &str) -> Result<(), StorageError> {
        self.kv_set(keys::DISPLAY_NAME, name)
    }
}
