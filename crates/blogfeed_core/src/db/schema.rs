//! `kv_entries` layout bootstrap.
//!
//! The store only ever needs one table, so there is no migration chain:
//! an unstamped database gets the table, a current one is left alone, and a
//! newer one is rejected.

use crate::store::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Layout version written to `PRAGMA user_version`.
pub const KV_SCHEMA_VERSION: u32 = 1;

const KV_ENTRIES_SQL: &str = include_str!("kv_entries.sql");

/// Reads the layout version stamped on `conn`. Fresh databases report 0.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

pub(super) fn ensure_kv_schema(conn: &mut Connection) -> StoreResult<()> {
    let found = schema_version(conn)?;
    match found.cmp(&KV_SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(StoreError::SchemaTooNew {
            found,
            supported: KV_SCHEMA_VERSION,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_ENTRIES_SQL)?;
            tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=kv_schema module=db status=created from_version={} to_version={}",
                found, KV_SCHEMA_VERSION
            );
            Ok(())
        }
    }
}
