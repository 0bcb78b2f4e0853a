//! Record store over a flat key-value substrate.
//!
//! # Responsibility
//! - Serialize one named collection as a JSON array under a single key.
//! - Treat missing or malformed entries as empty collections.
//! - Keep backend details (memory map, SQLite table) behind `StorageBackend`.
//!
//! # Invariants
//! - A write replaces the whole collection; there are no partial patches.
//! - A failed write leaves the previously stored value untouched.
//! - Reads never fail because of stored content, only because of backend faults.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a storage backend or while encoding a collection.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite failure while opening, querying or writing `kv_entries`.
    Sqlite(rusqlite::Error),
    /// Database file was written by a newer schema than this build knows.
    SchemaTooNew { found: u32, supported: u32 },
    /// Backend refused the write because it would exceed its capacity.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Collection could not be encoded as JSON.
    Encode(serde_json::Error),
    /// Backend connection is missing its key-value table.
    MissingTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "key-value schema version {found} is newer than supported {supported}"
            ),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes required, {quota_bytes} available"
            ),
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
            Self::MissingTable(table) => write!(f, "storage requires table `{table}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::QuotaExceeded { .. } | Self::MissingTable(_) => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// String-keyed, string-valued host storage.
///
/// Implementations use interior mutability; all calls run to completion on
/// the calling thread.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
    /// Removes every key.
    fn clear(&self) -> StoreResult<()>;
    /// Lists stored keys in ascending order.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Collection-level persistence primitive shared by all repositories.
pub struct RecordStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Underlying substrate, for diagnostics and raw inspection.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the collection stored under `key`.
    ///
    /// Missing keys, `null` and undecodable values all resolve to an empty
    /// collection. Only backend faults are returned as errors.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.backend.get_item(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<T>>>(&raw) {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(err) => {
                warn!(
                    "event=store_read module=store status=degraded key={} bytes={} error_code=malformed_collection error={}",
                    key,
                    raw.len(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the collection stored under `key`.
    pub fn write<T: Serialize>(&self, key: &str, records: &[T]) -> StoreResult<()> {
        let encoded = serde_json::to_string(records).map_err(StoreError::Encode)?;
        if let Err(err) = self.backend.set_item(key, &encoded) {
            warn!(
                "event=store_write module=store status=error key={} records={} error={}",
                key,
                records.len(),
                err
            );
            return Err(err);
        }

        debug!(
            "event=store_write module=store status=ok key={} records={} bytes={}",
            key,
            records.len(),
            encoded.len()
        );
        Ok(())
    }

    /// Drops the collection stored under `key`.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.backend.remove_item(key)
    }

    /// Lists every stored key.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        self.backend.keys()
    }

    /// Clears all keys unconditionally. Irreversible.
    pub fn reset(&self) -> StoreResult<()> {
        self.backend.clear()?;
        info!("event=store_reset module=store status=ok");
        Ok(())
    }
}
