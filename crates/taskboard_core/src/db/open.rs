//! Connection bootstrap for the board database.
//!
//! # Invariants
//! - Returned connections have the busy timeout configured.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a database file and applies pending migrations.
///
/// # Side effects
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_logged("file", || Connection::open(path))
}

/// Opens a private in-memory database with migrations applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", Connection::open_in_memory)
}

fn open_logged(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(|err| ("db_open_failed", DbError::from(err)))
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn)
                .map(|()| conn)
                .map_err(|err| ("db_bootstrap_failed", err))
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err((error_code, err)) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={error_code} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    apply_migrations(conn)
}
