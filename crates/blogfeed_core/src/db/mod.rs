//! SQLite bootstrap for the durable key-value substrate.
//!
//! # Responsibility
//! - Open file or in-memory connections for `SqliteStorage`.
//! - Create the `kv_entries` table and stamp its version.
//!
//! # Invariants
//! - `PRAGMA user_version` holds the `kv_entries` layout version.
//! - A database stamped with a newer layout is refused, never rewritten.

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{schema_version, KV_SCHEMA_VERSION};
