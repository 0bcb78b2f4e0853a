//! Connection bootstrap for the key-value database.
//!
//! # Invariants
//! - Returned connections already hold a current `kv_entries` table.

use super::schema::ensure_kv_schema;
use crate::store::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) the feed database at `path`.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let opened = Connection::open(path).map_err(StoreError::from);
    log_open("file", started_at, opened.and_then(prepare))
}

/// Opens a throwaway in-memory feed database.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    let started_at = Instant::now();
    let opened = Connection::open_in_memory().map_err(StoreError::from);
    log_open("memory", started_at, opened.and_then(prepare))
}

fn prepare(mut conn: Connection) -> StoreResult<Connection> {
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_kv_schema(&mut conn)?;
    Ok(conn)
}

fn log_open(
    mode: &str,
    started_at: Instant,
    result: StoreResult<Connection>,
) -> StoreResult<Connection> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}
