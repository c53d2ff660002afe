//! SQLite store backend over the migrated `kv_entries` table.
//!
//! # Invariants
//! - Construction fails unless the connection is at the latest schema version.
//! - One row per key; writes upsert, so the last write wins.

use super::{StoreBackend, StoreError, StoreResult};
use crate::db::migrations::latest_version;
use rusqlite::{params, Connection, OptionalExtension};

const KV_TABLE: &str = "kv_entries";

/// Durable backend borrowing a connection opened by `db::open_db`.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_kv_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StoreBackend for SqliteStore<'_> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn list_keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

fn ensure_kv_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StoreError::MissingRequiredTable(KV_TABLE));
    }

    Ok(())
}
