//! Key-value store contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide `load/save/delete` by logical key for config, roster and ledger.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `save` is an upsert; a later `load` of the same key returns the new value.
//! - `delete` of a missing key is not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Logical storage slots owned by the attendance session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKey {
    Config,
    Roster,
    Ledger,
}

impl StoreKey {
    /// Every key in load order.
    pub const ALL: [StoreKey; 3] = [StoreKey::Config, StoreKey::Roster, StoreKey::Ledger];

    /// Storage name for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "absensi_config",
            Self::Roster => "absensi_students",
            Self::Ledger => "absensi_attendance",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage failures surfaced by key-value implementations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to serialize stored value: {err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Persistence adapter used by the attendance session.
pub trait KeyValueStore {
    fn load(&self, key: StoreKey) -> StoreResult<Option<String>>;
    fn save(&self, key: StoreKey, value: &str) -> StoreResult<()>;
    fn delete(&self, key: StoreKey) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn load(&self, key: StoreKey) -> StoreResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        (**self).save(key, value)
    }

    fn delete(&self, key: StoreKey) -> StoreResult<()> {
        (**self).delete(key)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn load(&self, key: StoreKey) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    fn delete(&self, key: StoreKey) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])?;
        Ok(())
    }
}

/// Process-local store, used by hosts without durable storage and by tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<StoreKey, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load(&self, key: StoreKey) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn save(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        self.entries.borrow_mut().insert(key, value.to_string());
        Ok(())
    }

    fn delete(&self, key: StoreKey) -> StoreResult<()> {
        self.entries.borrow_mut().remove(&key);
        Ok(())
    }
}
