//! Persistent key-value state
//!
//! Only two values survive between runs: the canonical snapshot of the last
//! reported versions and whether a manual-update alert is outstanding.

#[cfg(test)]
use mockall::automock;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info};

/// Key of the canonical snapshot string
pub const VERSION_INFO_KEY: &str = "versionInfo";

/// Key of the `"true"`/`"false"` manual-update flag
pub const NEEDS_MANUAL_UPDATE_KEY: &str = "needsManualUpdate";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// Trait for storing and retrieving opaque string values
#[cfg_attr(test, automock)]
pub trait StateStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read the manual-update flag; anything but `"true"` counts as unset
pub fn load_needs_manual_update(store: &dyn StateStore) -> Result<bool, StoreError> {
    Ok(store.get(NEEDS_MANUAL_UPDATE_KEY)?.as_deref() == Some("true"))
}

pub fn save_needs_manual_update(store: &dyn StateStore, value: bool) -> Result<(), StoreError> {
    store.put(NEEDS_MANUAL_UPDATE_KEY, if value { "true" } else { "false" })
}

/// SQLite-backed [`StateStore`]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Opening state database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        debug!("State schema ready");
        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock_conn()?;
        let value: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            (key, value, Self::current_timestamp_ms()),
        )?;

        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }
}
