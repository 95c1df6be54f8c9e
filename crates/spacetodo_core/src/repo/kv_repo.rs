//! Key-value store contracts with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide `get`/`set`/`remove` over string keys and string values.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - A successful `set` is visible to the next `get` on the same store.
//! - Stores take `&self`; single-threaded interior mutability is allowed.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error for key-value operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-to-string map, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove(&self, key: &str) -> RepoResult<()>;
}

macro_rules! forward_kv_store {
    ($wrapper:ident) => {
        impl<S: KeyValueStore + ?Sized> KeyValueStore for $wrapper<S> {
            fn get(&self, key: &str) -> RepoResult<Option<String>> {
                (**self).get(key)
            }

            fn set(&self, key: &str, value: &str) -> RepoResult<()> {
                (**self).set(key, value)
            }

            fn remove(&self, key: &str) -> RepoResult<()> {
                (**self).remove(key)
            }
        }
    };
}

forward_kv_store!(Rc);
forward_kv_store!(Box);

/// SQLite-backed key-value store over the `kv_entries` table.
///
/// Owns its connection so it can live inside long-lived dispatchers.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        ensure_key(key)?;
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

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        ensure_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        ensure_key(key)?;
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local store with no durability.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        ensure_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        ensure_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        ensure_key(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

fn ensure_key(key: &str) -> RepoResult<()> {
    if key.trim().is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKvStore, RepoError};

    #[test]
    fn memory_store_overwrites_and_removes() {
        let store = MemoryKvStore::new();
        store.set("spaces", "[]").expect("insert");
        store.set("spaces", "[1]").expect("overwrite");
        assert_eq!(store.get("spaces").expect("read").as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.remove("spaces").expect("remove");
        store.remove("spaces").expect("removing a missing key is fine");
        assert_eq!(store.get("spaces").expect("read removed"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn blank_key_is_rejected() {
        let store = MemoryKvStore::new();
        let err = store.set("  ", "x").expect_err("blank key must be rejected");
        assert!(matches!(err, RepoError::InvalidKey(_)));
    }
}
