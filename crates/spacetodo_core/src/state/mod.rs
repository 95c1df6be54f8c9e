//! Application state snapshot and its store.
//!
//! # Responsibility
//! - Hold the space list together with the pending input buffers.
//! - Pair buffer entries with space creation/removal in one place.
//!
//! # Invariants
//! - The key set of `todo_inputs` equals the id set of `spaces`.
//! - Snapshots are never edited in place once published by the store;
//!   every mutation builds a new `AppState`.

pub mod ops;
pub mod store;

use crate::model::space::{Space, SpaceId, Todo, TodoId};
use std::collections::BTreeMap;

/// Complete state of one application session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    spaces: Vec<Space>,
    space_name_input: String,
    todo_inputs: BTreeMap<SpaceId, String>,
}

impl AppState {
    /// Empty state: no spaces, empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds state from restored spaces, with one empty buffer per space.
    pub fn from_spaces(spaces: Vec<Space>) -> Self {
        let todo_inputs = spaces
            .iter()
            .map(|space| (space.id, String::new()))
            .collect();
        Self {
            spaces,
            space_name_input: String::new(),
            todo_inputs,
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn space(&self, space_id: SpaceId) -> Option<&Space> {
        self.spaces.iter().find(|space| space.id == space_id)
    }

    pub fn todo(&self, space_id: SpaceId, todo_id: TodoId) -> Option<&Todo> {
        self.space(space_id)?.todo(todo_id)
    }

    /// Text currently typed for a new space name.
    pub fn space_name_input(&self) -> &str {
        &self.space_name_input
    }

    /// Text currently typed for a new todo in `space_id`.
    ///
    /// Returns `None` for unknown spaces.
    pub fn todo_input(&self, space_id: SpaceId) -> Option<&str> {
        self.todo_inputs.get(&space_id).map(String::as_str)
    }

    /// Space ids that own a todo input buffer.
    pub fn todo_input_keys(&self) -> impl Iterator<Item = SpaceId> + '_ {
        self.todo_inputs.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    fn space_mut(&mut self, space_id: SpaceId) -> Option<&mut Space> {
        self.spaces.iter_mut().find(|space| space.id == space_id)
    }

    fn todo_mut(&mut self, space_id: SpaceId, todo_id: TodoId) -> Option<&mut Todo> {
        self.space_mut(space_id)?
            .todos
            .iter_mut()
            .find(|todo| todo.id == todo_id)
    }

    /// Appends a space and its buffer entry together.
    fn create_space(&mut self, space: Space) {
        self.todo_inputs.insert(space.id, String::new());
        self.spaces.push(space);
    }

    /// Removes a space and its buffer entry together.
    ///
    /// Returns `false` when the id is unknown.
    fn remove_space(&mut self, space_id: SpaceId) -> bool {
        let before = self.spaces.len();
        self.spaces.retain(|space| space.id != space_id);
        self.todo_inputs.remove(&space_id);
        self.spaces.len() != before
    }
}
