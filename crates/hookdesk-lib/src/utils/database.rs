// SQLite Database Connection Management
// Provides thread-safe database access for the key-value storage scopes

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use super::paths::get_app_data_dir;
use super::schema;

/// Database file name
#[cfg(debug_assertions)]
pub const DATABASE_FILE: &str = "hookdesk-dev.db";

#[cfg(not(debug_assertions))]
pub const DATABASE_FILE: &str = "hookdesk.db";

/// Thread-safe database wrapper
/// Uses Arc<Mutex<Connection>> for concurrent access from multiple threads
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Create a new database connection
    /// Automatically enables WAL mode and runs migrations
    pub fn new(path: PathBuf) -> Result<Self, String> {
        // Data directory may not exist on first run
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create database directory: {}", e))?;
        }

        let conn = Connection::open(&path)
            .map_err(|e| format!("Failed to open database: {}", e))?;

        // Configure SQLite for concurrent access from the app and the CLI
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA busy_timeout=5000;
            PRAGMA synchronous=NORMAL;
            "#,
        )
        .map_err(|e| format!("Failed to configure database: {}", e))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        // Bring the key-value schema up to date
        db.run_migrations()?;

        Ok(db)
    }

    /// Get database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get a lock on the connection for executing queries
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>, String> {
        self.conn
            .lock()
            .map_err(|e| format!("Failed to acquire database lock: {}", e))
    }

    /// Run all pending migrations in one transaction
    fn run_migrations(&self) -> Result<(), String> {
        self.with_transaction(schema::run_migrations)
    }

    /// Execute a function with the database connection
    /// The closure should return Result<T, String> with errors already converted
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Connection) -> Result<T, String>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a function inside a transaction
    /// Commits on success, rolls back on error
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Connection) -> Result<T, String>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| format!("Failed to start transaction: {}", e))?;

        // Dropping an uncommitted transaction rolls it back
        let result = f(&tx)?;
        tx.commit()
            .map_err(|e| format!("Failed to commit transaction: {}", e))?;
        Ok(result)
    }

    /// Get the current schema version
    pub fn schema_version(&self) -> Result<i32, String> {
        self.with_connection(schema::get_version)
    }
}

/// Get the default database path
pub fn get_database_path() -> Result<PathBuf, String> {
    get_app_data_dir().map(|p| p.join(DATABASE_FILE))
}

/// Open the default database
pub fn open_default_database() -> Result<Database, String> {
    let path = get_database_path()?;
    log::debug!("[storage] Opening database at {}", path.display());
    Database::new(path)
}
