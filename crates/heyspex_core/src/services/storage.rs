//! Local SQLite storage for persisted UI preferences.
//!
//! The layout engine treats this as a flat key-value store: every persisted
//! preference (panel widths, zone modes, visibility flags) is a JSON value
//! under a string key. Reads are defensive — a missing key, a storage error,
//! or a value of the wrong JSON type all fall back to the caller's default,
//! because layout preferences must never block rendering.
//!
//! # Data Directory Locations
//!
//! - **macOS**: `~/Library/Application Support/dev.heyspex.HeySpex`
//! - **Windows**: `%APPDATA%\heyspex\HeySpex`
//! - **Linux**: `~/.local/share/heyspex`
//! - **Debug builds**: `./heyspex_data` in current directory

use crate::error::HeySpexError;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

/// Get the default data directory for the application.
pub fn default_data_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from("./heyspex_data")
    }

    #[cfg(not(debug_assertions))]
    {
        dirs::data_dir()
            .map(|d| {
                #[cfg(target_os = "macos")]
                {
                    d.join("dev.heyspex.HeySpex")
                }
                #[cfg(target_os = "windows")]
                {
                    d.join("heyspex").join("HeySpex")
                }
                #[cfg(target_os = "linux")]
                {
                    d.join("heyspex")
                }
                #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
                {
                    d.join("heyspex")
                }
            })
            .unwrap_or_else(|| PathBuf::from("./heyspex_data"))
    }
}

/// Initialize the data directory, creating it if needed.
pub fn init_data_dir(path: &PathBuf) -> Result<(), HeySpexError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(HeySpexError::storage(
                format!("Data path exists but is not a directory: {}", path.display()),
                Some("Select a different location or remove the existing file"),
            ));
        }
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|e| {
        HeySpexError::storage(
            format!("Failed to create data directory '{}': {}", path.display(), e),
            Some("Check permissions or select a different location"),
        )
    })?;

    tracing::info!(path = %path.display(), "Created data directory");
    Ok(())
}

/// SQLite-based key-value store for UI preferences.
///
/// Thread-safe via internal Mutex. Uses WAL mode for concurrent reads.
pub struct PreferenceStore {
    /// Thread-safe SQLite connection
    connection: Mutex<Connection>,
    /// Data directory path
    data_dir: PathBuf,
}

impl PreferenceStore {
    /// Open or create the preference store in the given data directory.
    pub fn open(data_dir: PathBuf) -> Result<Self, HeySpexError> {
        init_data_dir(&data_dir)?;
        let db_path = data_dir.join("preferences.db");
        Self::open_with_path(db_path, data_dir)
    }

    /// Open the store with a specific database path (for testing).
    pub fn open_with_path(db_path: PathBuf, data_dir: PathBuf) -> Result<Self, HeySpexError> {
        let connection = Connection::open(&db_path).map_err(|e| {
            HeySpexError::storage(
                format!("Failed to open database '{}': {}", db_path.display(), e),
                Some("The database file may be corrupted. Try deleting it to start fresh."),
            )
        })?;

        Self::configure_connection(&connection)?;

        let store = Self { connection: Mutex::new(connection), data_dir };
        store.run_migrations()?;

        tracing::info!(path = %db_path.display(), "Preference store opened");
        Ok(store)
    }

    /// Configure SQLite connection with optimal pragmas.
    fn configure_connection(conn: &Connection) -> Result<(), HeySpexError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA temp_store = MEMORY;
            ",
        )
        .map_err(|e| HeySpexError::storage(format!("Failed to configure database: {e}"), None))
    }

    /// Run database migrations.
    fn run_migrations(&self) -> Result<(), HeySpexError> {
        let conn = self.connection.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS migrations (
                domain TEXT NOT NULL,
                step INTEGER NOT NULL,
                migration TEXT NOT NULL,
                PRIMARY KEY(domain, step)
            ) STRICT",
            [],
        )
        .map_err(|e| {
            HeySpexError::storage(format!("Failed to create migrations table: {e}"), None)
        })?;

        const DOMAIN: &str = "preferences";

        let current_step: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(step), 0) FROM migrations WHERE domain = ?",
                [DOMAIN],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if current_step < 1 {
            conn.execute_batch(
                "
                CREATE TABLE preferences (
                    key TEXT PRIMARY KEY,
                    value_json TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                ) STRICT;
                ",
            )
            .map_err(|e| HeySpexError::storage(format!("Migration 1 failed: {e}"), None))?;

            conn.execute(
                "INSERT INTO migrations (domain, step, migration) VALUES (?1, 1, 'preferences table')",
                [DOMAIN],
            )
            .map_err(|e| HeySpexError::storage(format!("Failed to record migration: {e}"), None))?;
        }

        Ok(())
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    // ========== Key-Value Operations ==========

    /// Save a preference value under the given key.
    pub fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), HeySpexError> {
        let conn = self.connection.lock();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO preferences (key, value_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at",
            params![key, serde_json::to_string(value).unwrap_or_default(), now],
        )
        .map_err(|e| HeySpexError::storage(format!("Failed to save preference: {e}"), None))?;

        tracing::trace!(key, "Preference saved");
        Ok(())
    }

    /// Load a preference value by key.
    ///
    /// Returns `Ok(None)` for a missing key. A stored value that is not valid
    /// JSON is reported as a storage error; callers treat it as absent.
    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>, HeySpexError> {
        let conn = self.connection.lock();

        let result: Option<String> = conn
            .query_row("SELECT value_json FROM preferences WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| HeySpexError::storage(format!("Failed to load preference: {e}"), None))?;

        match result {
            Some(json_str) => {
                let value = serde_json::from_str(&json_str).map_err(|e| {
                    HeySpexError::storage(format!("Invalid preference JSON: {e}"), None)
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete a preference by key.
    pub fn delete(&self, key: &str) -> Result<(), HeySpexError> {
        let conn = self.connection.lock();

        conn.execute("DELETE FROM preferences WHERE key = ?", [key])
            .map_err(|e| HeySpexError::storage(format!("Failed to delete preference: {e}"), None))?;

        Ok(())
    }

    // ========== Defensive Typed Reads ==========

    /// Load a boolean preference, falling back to `default` on a missing key,
    /// a storage error, or a non-boolean value.
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Ok(Some(serde_json::Value::Bool(b))) => b,
            Ok(Some(other)) => {
                tracing::warn!(key, value = %other, "Stored preference is not a boolean, using default");
                default
            }
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read preference, using default");
                default
            }
        }
    }

    /// Load an integer preference, falling back to `default` on a missing key,
    /// a storage error, or a non-integer value.
    pub fn get_i64_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Ok(Some(serde_json::Value::Number(n))) => n.as_i64().unwrap_or_else(|| {
                tracing::warn!(key, value = %n, "Stored preference is not an integer, using default");
                default
            }),
            Ok(Some(other)) => {
                tracing::warn!(key, value = %other, "Stored preference is not a number, using default");
                default
            }
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read preference, using default");
                default
            }
        }
    }

    /// Load a string preference, falling back to `default` on a missing key,
    /// a storage error, or a non-string value.
    pub fn get_str_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Ok(Some(serde_json::Value::String(s))) => s,
            Ok(Some(other)) => {
                tracing::warn!(key, value = %other, "Stored preference is not a string, using default");
                default.to_string()
            }
            Ok(None) => default.to_string(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read preference, using default");
                default.to_string()
            }
        }
    }
}
