//! SQLite file behind the attendance key-value store.
//!
//! # Responsibility
//! - Open the database that `SqliteKeyValueStore` reads and writes.
//! - Bring the `kv_entries` schema up to date before handing out a connection.
//!
//! # Invariants
//! - A connection returned by `open_db`/`open_db_in_memory` has every known
//!   migration applied.
//! - A file written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, migrating or querying the attendance database.
#[derive(Debug)]
pub enum DbError {
    /// The connection could not be opened or configured.
    Open(rusqlite::Error),
    /// A migration script failed; the whole pending batch was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// `PRAGMA user_version` is ahead of the migrations this build knows.
    SchemaTooNew { found: u32, supported: u32 },
    /// A `kv_entries` read or write failed.
    Query(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "cannot open attendance database: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version} ({name}) failed: {source}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "attendance database schema {found} is newer than this build supports ({supported})"
            ),
            Self::Query(err) => write!(f, "attendance store query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) | Self::Query(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}
