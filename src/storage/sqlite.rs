//! SQLite-backed key/value store
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Result};
use log::{debug, info};
use sqlite::{Connection, State};
use std::sync::Mutex;

use super::KeyValueStore;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and make sure the table exists
    pub fn open(path: &str) -> Result<Self> {
        let connection =
            sqlite::open(path).map_err(|e| anyhow!("Failed to open database {path}: {e}"))?;
        connection.execute(SCHEMA)?;
        info!("Opened key/value store at {path}");

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// An in-memory database, gone when the store is dropped
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let connection = self.lock()?;
        let mut statement = connection.prepare("SELECT value FROM kv_store WHERE key = ?")?;
        statement.bind((1, key))?;

        if let State::Row = statement.next()? {
            let value = statement.read::<String, _>("value")?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let connection = self.lock()?;
        let mut statement =
            connection.prepare("INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)")?;
        statement.bind((1, key))?;
        statement.bind((2, value))?;
        while let State::Row = statement.next()? {}

        debug!("Wrote {} bytes under '{key}'", value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let connection = self.lock()?;
        let mut statement = connection.prepare("DELETE FROM kv_store WHERE key = ?")?;
        statement.bind((1, key))?;
        while let State::Row = statement.next()? {}
        Ok(())
    }
}
