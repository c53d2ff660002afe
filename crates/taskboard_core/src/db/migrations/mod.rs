//! Schema migration registry and executor.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - All pending migrations run in one transaction.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file is newer than this binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={current} to_version={latest}");
    Ok(())
}
