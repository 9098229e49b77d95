use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result;

use crate::core::error::AppResult;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and creates the
/// `users` and `files` tables if they are missing. A failed migration is
/// returned as an error; the pool is never handed out without its schema.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Returns
///
/// Returns a `DbPool` on success, `AppError::DatabasePool` if the pool cannot
/// be built and `AppError::Database` if the schema cannot be created.
///
/// # Example
///
/// ```no_run
/// use filestore_bot::storage::db;
///
/// let pool = db::create_pool("filestore.sqlite")?;
/// # Ok::<(), filestore_bot::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder()
        .max_size(10) // Maximum 10 connections in the pool
        .build(manager)?;

    let conn = pool.get()?;
    if let Err(e) = migrate_schema(&conn) {
        log::error!("Failed to migrate schema at {}: {}", database_path, e);
        return Err(e.into());
    }

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Creates the tables and indexes used by the bot.
///
/// `files.channel_message_id` is UNIQUE: each relayed copy is registered once.
pub fn migrate_schema(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            join_date TEXT NOT NULL,
            last_active TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_file_id TEXT NOT NULL,
            owner_id INTEGER NOT NULL,
            channel_message_id INTEGER NOT NULL UNIQUE,
            display_name TEXT,
            size_bytes INTEGER,
            mime_type TEXT,
            share_link TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_files_owner_id ON files(owner_id);",
    )
}

/// Serializes a timestamp the way every table stores it.
///
/// Fixed-width RFC 3339 in UTC, so text ordering matches time ordering.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Reads a timestamp column written by [`format_timestamp`].
pub(crate) fn timestamp_column(row: &rusqlite::Row<'_>, idx: usize) -> Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}
