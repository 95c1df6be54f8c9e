//! Owner of the current application state.
//!
//! # Responsibility
//! - Publish immutable snapshots that renderers can hold onto.
//! - Replace the snapshot wholesale on every mutation.
//!
//! # Invariants
//! - The store is the only writer of application state.
//! - `revision` increases only when a mutation actually changed the state.

use super::AppState;
use std::rc::Rc;

/// What a mutation did to the published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Any part of the state changed, buffers included.
    pub changed: bool,
    /// The space list (names, todos, flags) changed.
    pub spaces_changed: bool,
}

impl Transition {
    const UNCHANGED: Self = Self {
        changed: false,
        spaces_changed: false,
    };
}

/// Single-writer holder of the current `AppState` snapshot.
#[derive(Debug, Default)]
pub struct StateStore {
    current: Rc<AppState>,
    revision: u64,
}

impl StateStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            current: Rc::new(initial),
            revision: 0,
        }
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Rc<AppState> {
        Rc::clone(&self.current)
    }

    pub fn state(&self) -> &AppState {
        &self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Runs one pure transition against the current snapshot and publishes
    /// the result when it differs.
    pub fn apply<F>(&mut self, transition: F) -> Transition
    where
        F: FnOnce(&AppState) -> AppState,
    {
        let next = transition(&self.current);
        if next == *self.current {
            return Transition::UNCHANGED;
        }

        let spaces_changed = next.spaces() != self.current.spaces();
        self.current = Rc::new(next);
        self.revision += 1;
        Transition {
            changed: true,
            spaces_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StateStore;
    use crate::state::{ops, AppState};

    #[test]
    fn apply_replaces_snapshot_and_keeps_old_one_intact() {
        let mut store = StateStore::new(AppState::new());
        let before = store.snapshot();

        let transition = store.apply(|state| ops::add_space(state, "Work"));

        assert!(transition.changed);
        assert!(transition.spaces_changed);
        assert!(before.spaces().is_empty());
        assert_eq!(store.state().spaces().len(), 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn noop_transition_does_not_bump_revision() {
        let mut store = StateStore::new(AppState::new());
        let before = store.snapshot();

        let transition = store.apply(|state| ops::add_space(state, "  "));

        assert!(!transition.changed);
        assert_eq!(store.revision(), 0);
        assert!(std::rc::Rc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn buffer_edit_changes_state_but_not_spaces() {
        let mut store = StateStore::new(AppState::new());
        let transition = store.apply(|state| ops::set_space_name_input(state, "Wo"));

        assert!(transition.changed);
        assert!(!transition.spaces_changed);
    }
}
