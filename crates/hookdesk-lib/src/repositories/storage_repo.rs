// Storage Repository
// SQLite-backed key-value scopes ("local" and "session")

use rusqlite::{params, OptionalExtension};

use crate::error::{HookdeskError, HookdeskResult};
use crate::utils::database::Database;
use crate::utils::store::KeyValueStore;

/// Namespace for values that outlive a session (config, last executions)
pub const LOCAL_NAMESPACE: &str = "local";

/// Namespace for session-scoped values (automation log).
///
/// Rows here live as long as the database file; nothing expires them when a
/// process exits. `AppState::in_memory` gives a log that ends with the process.
pub const SESSION_NAMESPACE: &str = "session";

/// Repository for one key-value namespace
#[derive(Clone)]
pub struct StorageRepository {
    db: Database,
    namespace: String,
}

impl StorageRepository {
    /// Create a new StorageRepository over `namespace`
    pub fn new(db: Database, namespace: &str) -> Self {
        Self {
            db,
            namespace: namespace.to_string(),
        }
    }

    pub fn local(db: Database) -> Self {
        Self::new(db, LOCAL_NAMESPACE)
    }

    pub fn session(db: Database) -> Self {
        Self::new(db, SESSION_NAMESPACE)
    }

    /// Get a value
    pub fn get_value(&self, key: &str) -> Result<Option<String>, String> {
        self.db.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| format!("Failed to read '{}': {}", key, e))
        })
    }

    /// Insert or replace a value
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), String> {
        self.db.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (namespace, key, value, updated_at)
                VALUES (?1, ?2, ?3, datetime('now'))
                ON CONFLICT(namespace, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![self.namespace, key, value],
            )
            .map_err(|e| format!("Failed to write '{}': {}", key, e))?;

            Ok(())
        })
    }

    /// Delete a value
    pub fn delete_value(&self, key: &str) -> Result<bool, String> {
        self.db.with_connection(|conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM kv_store WHERE namespace = ?1 AND key = ?2",
                    params![self.namespace, key],
                )
                .map_err(|e| format!("Failed to delete '{}': {}", key, e))?;

            Ok(deleted > 0)
        })
    }
}

impl KeyValueStore for StorageRepository {
    fn get(&self, key: &str) -> HookdeskResult<Option<String>> {
        self.get_value(key).map_err(HookdeskError::Storage)
    }

    fn set(&self, key: &str, value: &str) -> HookdeskResult<()> {
        self.set_value(key, value).map_err(HookdeskError::Storage)
    }

    fn remove(&self, key: &str) -> HookdeskResult<()> {
        self.delete_value(key)
            .map(|_| ())
            .map_err(HookdeskError::Storage)
    }
}
