//! Schema setup for the libSQL backend.
//!
//! The schema is one key-value table. Its version lives in SQLite's
//! `user_version` pragma; bump [`SCHEMA_VERSION`] and extend
//! [`run_migrations`] when the table changes.

use libsql::Connection;

use crate::error::StorageError;

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_KV_ENTRIES: &str = "
    CREATE TABLE IF NOT EXISTS kv_entries (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Bring the schema up to [`SCHEMA_VERSION`].
pub async fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let version = schema_version(conn).await?;
    if version >= SCHEMA_VERSION {
        tracing::debug!(version, "Storage schema up to date");
        return Ok(());
    }

    tracing::info!(from = version, to = SCHEMA_VERSION, "Creating storage schema");
    conn.execute_batch(&format!(
        "{CREATE_KV_ENTRIES} PRAGMA user_version = {SCHEMA_VERSION};"
    ))
    .await
    .map_err(|e| StorageError::Migration(format!("Failed to create kv_entries: {e}")))?;
    Ok(())
}

/// The schema version recorded in the database, 0 for a fresh file.
pub async fn schema_version(conn: &Connection) -> Result<i64, StorageError> {
    let mut rows = conn
        .query("PRAGMA user_version", ())
        .await
        .map_err(|e| StorageError::Migration(format!("Failed to read schema version: {e}")))?;
    match rows
        .next()
        .await
        .map_err(|e| StorageError::Migration(format!("Failed to read schema version: {e}")))?
    {
        Some(row) => row
            .get::<i64>(0)
            .map_err(|e| StorageError::Migration(format!("Bad schema version: {e}"))),
        None => Ok(0),
    }
}
