use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::history::StateStore;

pub struct Database {
    pub conn: Connection,
    pub path: PathBuf,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // Performance pragmas
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA cache_size = -64000;",
        )?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;

        info!("Opened database: {}", path.display());

        Ok(Database {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Default database path: ~/.tubeinsight/tubeinsight.db
    pub fn default_db_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".tubeinsight").join("tubeinsight.db"))
    }

    /// Get an app state value by key.
    pub fn get_state(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM app_state WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(result)
    }

    /// Set an app state value (upsert).
    pub fn set_state(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Delete an app state value.
    pub fn delete_state(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM app_state WHERE key = ?1", [key])?;
        Ok(())
    }
}

impl StateStore for Database {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.get_state(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.set_state(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.delete_state(key)
    }
}
