//! SQLite-backed key-value store.
//!
//! The original client kept everything in browser localStorage as JSON blobs
//! under string keys. This module reproduces that contract on top of a single
//! SQLite table so records survive outside a browser profile.

use directories::ProjectDirs;
use rusqlite::Connection;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage key for the root [`crate::models::AppState`] record.
pub const KEY_APP_STATE: &str = "estudiapp";
/// Storage key for [`crate::models::PomodoroConfig`].
pub const KEY_POMODORO_CONFIG: &str = "pomodoroConfig";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to create storage directory")]
    DirectoryCreation,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the store at the default per-user data path, initializing the
    /// schema if needed.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(&Self::default_path())
    }

    /// Opens the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|_| StoreError::DirectoryCreation)?;
        }

        let conn = Connection::open(path)?;
        Self::initialize_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_tables(&conn)?;
        Ok(Self { conn })
    }

    fn initialize_tables(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    fn default_path() -> PathBuf {
        ProjectDirs::from("com", "estudia", "Estudia")
            .map(|dirs| dirs.data_dir().join("estudia.db"))
            .unwrap_or_else(|| PathBuf::from("estudia.db"))
    }

    /// Loads and deserializes the value stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .ok();

        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and writes it under `key`, replacing any prior value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value) VALUES (?, ?)",
            [key, &json],
        )?;
        Ok(())
    }

    /// Writes a raw string under `key`, bypassing serialization. Used by tests
    /// to plant malformed records.
    #[cfg(test)]
    pub(crate) fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value) VALUES (?, ?)",
            [key, value],
        )?;
        Ok(())
    }
}
