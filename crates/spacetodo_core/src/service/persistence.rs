//! Persistence adapter mirroring spaces into key-value storage.
//!
//! # Responsibility
//! - Read/write the persistence flag and the space snapshot.
//! - Degrade every storage or decoding failure to a safe default.
//!
//! # Invariants
//! - Load paths never fail: missing, unparsable or invalid data yields
//!   `false` / an empty list.
//! - `load_spaces` returns nothing while the stored flag is `false`.
//! - Saved snapshots reload with identical ids, names, text and flags.

use crate::model::space::{validate_snapshot, Space};
use crate::repo::kv_repo::KeyValueStore;
use log::{debug, error, warn};

/// Storage key of the persistence flag (JSON boolean).
pub const PERSISTENCE_FLAG_KEY: &str = "useLocalStorage";
/// Storage key of the space list (JSON array).
pub const SPACES_KEY: &str = "spaces";

/// Load/save seam between the dispatcher and durable storage.
pub trait PersistenceAdapter {
    fn load_persistence_flag(&self) -> bool;
    fn load_spaces(&self) -> Vec<Space>;
    fn save_persistence_flag(&self, enabled: bool);
    fn save_spaces(&self, spaces: &[Space]);
}

/// JSON-over-key-value implementation of `PersistenceAdapter`.
pub struct KvPersistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=persist_read module=persistence status=error key={key} error_code=storage_read_failed error={err}"
                );
                None
            }
        }
    }

    fn write_raw(&self, key: &str, value: &str) {
        match self.store.set(key, value) {
            Ok(()) => debug!(
                "event=persist_write module=persistence status=ok key={key} bytes={}",
                value.len()
            ),
            Err(err) => error!(
                "event=persist_write module=persistence status=error key={key} error_code=storage_write_failed error={err}"
            ),
        }
    }
}

impl<S: KeyValueStore> PersistenceAdapter for KvPersistence<S> {
    fn load_persistence_flag(&self) -> bool {
        let Some(raw) = self.read_raw(PERSISTENCE_FLAG_KEY) else {
            return false;
        };
        match serde_json::from_str::<Option<bool>>(&raw) {
            Ok(flag) => flag.unwrap_or(false),
            Err(err) => {
                warn!(
                    "event=persist_read module=persistence status=error key={PERSISTENCE_FLAG_KEY} error_code=decode_failed error={err}"
                );
                false
            }
        }
    }

    fn load_spaces(&self) -> Vec<Space> {
        if !self.load_persistence_flag() {
            return Vec::new();
        }
        let Some(raw) = self.read_raw(SPACES_KEY) else {
            return Vec::new();
        };

        let spaces = match serde_json::from_str::<Option<Vec<Space>>>(&raw) {
            Ok(spaces) => spaces.unwrap_or_default(),
            Err(err) => {
                warn!(
                    "event=persist_read module=persistence status=error key={SPACES_KEY} error_code=decode_failed error={err}"
                );
                return Vec::new();
            }
        };
        if let Err(err) = validate_snapshot(&spaces) {
            warn!(
                "event=persist_read module=persistence status=error key={SPACES_KEY} error_code=invalid_snapshot error={err}"
            );
            return Vec::new();
        }

        debug!(
            "event=persist_read module=persistence status=ok key={SPACES_KEY} spaces={}",
            spaces.len()
        );
        spaces
    }

    fn save_persistence_flag(&self, enabled: bool) {
        let raw = if enabled { "true" } else { "false" };
        self.write_raw(PERSISTENCE_FLAG_KEY, raw);
    }

    fn save_spaces(&self, spaces: &[Space]) {
        match serde_json::to_string(spaces) {
            Ok(raw) => self.write_raw(SPACES_KEY, &raw),
            Err(err) => error!(
                "event=persist_write module=persistence status=error key={SPACES_KEY} error_code=encode_failed error={err}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KvPersistence, PersistenceAdapter, PERSISTENCE_FLAG_KEY, SPACES_KEY};
    use crate::model::space::{Space, Todo};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKvStore};

    fn sample_spaces() -> Vec<Space> {
        let mut work = Space::new("Work");
        work.todos.push(Todo::new("Write spec"));
        let mut done = Todo::new("");
        done.completed = true;
        work.todos.push(done);
        vec![work, Space::new("Home")]
    }

    #[test]
    fn missing_keys_load_defaults() {
        let persistence = KvPersistence::new(MemoryKvStore::new());
        assert!(!persistence.load_persistence_flag());
        assert!(persistence.load_spaces().is_empty());
    }

    #[test]
    fn spaces_round_trip_when_enabled() {
        let persistence = KvPersistence::new(MemoryKvStore::new());
        let spaces = sample_spaces();

        persistence.save_persistence_flag(true);
        persistence.save_spaces(&spaces);

        assert!(persistence.load_persistence_flag());
        assert_eq!(persistence.load_spaces(), spaces);
    }

    #[test]
    fn spaces_are_hidden_while_flag_is_off() {
        let persistence = KvPersistence::new(MemoryKvStore::new());
        persistence.save_spaces(&sample_spaces());
        persistence.save_persistence_flag(false);

        assert!(persistence.load_spaces().is_empty());
    }

    #[test]
    fn corrupt_values_fall_back_to_defaults() {
        let store = MemoryKvStore::new();
        store.set(PERSISTENCE_FLAG_KEY, "not-json").expect("write flag");
        store.set(SPACES_KEY, "[{\"id\":").expect("write blob");
        let persistence = KvPersistence::new(store);

        assert!(!persistence.load_persistence_flag());
        persistence.save_persistence_flag(true);
        assert!(persistence.load_spaces().is_empty());
    }

    #[test]
    fn null_values_are_treated_as_unset() {
        let store = MemoryKvStore::new();
        store.set(PERSISTENCE_FLAG_KEY, "true").expect("write flag");
        store.set(SPACES_KEY, "null").expect("write blob");
        let persistence = KvPersistence::new(store);

        assert!(persistence.load_spaces().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected_as_corrupt() {
        let space = Space::new("Work");
        let persistence = KvPersistence::new(MemoryKvStore::new());
        persistence.save_persistence_flag(true);
        persistence.save_spaces(&[space.clone(), space]);

        assert!(persistence.load_spaces().is_empty());
    }

    #[test]
    fn stored_shape_matches_browser_layout() {
        let persistence = KvPersistence::new(MemoryKvStore::new());
        let spaces = sample_spaces();
        persistence.save_spaces(&spaces);

        let raw = persistence
            .store()
            .get(SPACES_KEY)
            .expect("read spaces")
            .expect("spaces should be saved");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("spaces should be JSON");
        assert_eq!(json[0]["id"], spaces[0].id.to_string());
        assert_eq!(json[0]["name"], "Work");
        assert_eq!(json[0]["todos"][0]["text"], "Write spec");
        assert_eq!(json[0]["todos"][1]["completed"], true);
    }
}
