// SQLite database setup and migrations
use rusqlite::{Connection, ErrorCode};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

use super::config::{ConfigError, StoreConfig};
use super::storage::{resolve_db_path, StorageError};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database task failed: {0}")]
    TaskFailed(String),
    #[error("Database initialization failed: {0}")]
    InitFailed(String),
}

impl DbError {
    /// True for primary key, unique and foreign key violations
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

pub type DbResult<T> = Result<T, DbError>;

// Thread-safe database connection wrapper
pub struct DbConnection {
    conn: Arc<Mutex<Connection>>,
}

impl DbConnection {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        // Poisoning is ignored: the connection holds no in-process invariants
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for DbConnection {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

/// Open the database file described by `config`
pub fn init_db(config: &StoreConfig) -> DbResult<DbConnection> {
    if config.db_file_name.trim().is_empty() {
        return Err(DbError::InitFailed(
            "database file name is empty".to_string(),
        ));
    }

    let db_path = resolve_db_path(config)?;
    log::info!("Opening row counter database at {}", db_path.display());

    let conn = Connection::open(&db_path)?;
    prepare_connection(&conn, config)?;

    Ok(DbConnection::new(conn))
}

/// Open a private in-memory database with the full schema
pub fn open_in_memory(config: &StoreConfig) -> DbResult<DbConnection> {
    let conn = Connection::open_in_memory()?;
    prepare_connection(&conn, config)?;
    Ok(DbConnection::new(conn))
}

fn prepare_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

    let foreign_keys = if config.enforce_foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;

    run_migrations(conn).map_err(|e| {
        log::error!("Failed to migrate database: {}", e);
        e
    })
}

fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current_version < 1 {
        migration_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (?1)", [1])?;
        log::info!("Applied schema migration v1");
    }

    Ok(())
}

fn migration_v1(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date_created INTEGER NOT NULL,
            time_taken INTEGER NOT NULL DEFAULT 0,
            date_completed INTEGER,
            is_complete INTEGER NOT NULL DEFAULT 0,
            type TEXT NOT NULL DEFAULT 'knitting'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS parts (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            owning_project_id INTEGER NOT NULL,
            is_current INTEGER NOT NULL DEFAULT 0,
            is_complete INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (owning_project_id) REFERENCES projects(id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_parts_owning_project_id ON parts(owning_project_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS counters (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            current_value INTEGER NOT NULL DEFAULT 0,
            can_go_negative INTEGER NOT NULL DEFAULT 0,
            increment_by INTEGER NOT NULL DEFAULT 1,
            type TEXT NOT NULL DEFAULT 'normal',
            is_globally_linked INTEGER NOT NULL DEFAULT 0,
            reset_row INTEGER NOT NULL DEFAULT 0,
            max_resets INTEGER NOT NULL DEFAULT 0,
            current_resets INTEGER NOT NULL DEFAULT 0,
            owning_part_id INTEGER NOT NULL,
            FOREIGN KEY (owning_part_id) REFERENCES parts(id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_counters_owning_part_id ON counters(owning_part_id)",
        [],
    )?;

    // At most one global and one stitch counter per part
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_counters_singleton_type
         ON counters(owning_part_id, type) WHERE type IN ('global', 'stitch')",
        [],
    )?;

    Ok(())
}
