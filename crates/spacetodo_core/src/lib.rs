//! Core logic for SpaceTodo: spaces of todos, animation-gated removals and
//! optional local persistence.
//! This crate is the single source of truth for state invariants.

pub mod animation;
pub mod config;
pub mod db;
pub mod input;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;

pub use animation::{
    AnimationProfile, AnimationSequencer, AnimationTarget, ExitCompletion, ExitSignal,
    ExitStatus, ImmediateSequencer,
};
pub use config::{AppConfig, ConfigError};
pub use input::{InputFocus, Key};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::space::{Space, SpaceId, Todo, TodoId};
pub use repo::kv_repo::{KeyValueStore, MemoryKvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::dispatcher::{DispatchOutcome, Dispatcher, DispatcherOptions};
pub use service::persistence::{KvPersistence, PersistenceAdapter};
pub use state::store::StateStore;
pub use state::AppState;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
