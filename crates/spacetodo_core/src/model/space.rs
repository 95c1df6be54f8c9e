//! Space and todo domain model.
//!
//! # Responsibility
//! - Define the records owned by the state store and mirrored to storage.
//! - Keep the wire shape stable: `{id, name, todos: [{id, text, completed}]}`.
//!
//! # Invariants
//! - Space ids are globally unique and never reused.
//! - Todo ids are unique for the lifetime of the application.
//! - A todo belongs to exactly one space.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one space.
pub type SpaceId = Uuid;

/// Stable identifier of one todo.
pub type TodoId = Uuid;

/// Single task item inside a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    /// Replaced verbatim on edit, so it may become empty after creation.
    pub text: String,
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo with a generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates an open todo with a caller-provided id.
    pub fn with_id(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Named, user-created container of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    /// Display order is insertion order.
    pub todos: Vec<Todo>,
}

impl Space {
    /// Creates an empty space with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates an empty space with a caller-provided id.
    ///
    /// Used by restore paths where identity already exists in storage.
    pub fn with_id(id: SpaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            todos: Vec::new(),
        }
    }

    pub fn todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Number of todos currently marked as completed.
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }
}

/// Reasons a restored space list cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    NilId,
    DuplicateSpaceId(SpaceId),
    DuplicateTodoId(TodoId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "snapshot contains a nil id"),
            Self::DuplicateSpaceId(id) => write!(f, "duplicate space id in snapshot: {id}"),
            Self::DuplicateTodoId(id) => write!(f, "duplicate todo id in snapshot: {id}"),
        }
    }
}

impl Error for SnapshotError {}

/// Checks id uniqueness across a whole space list.
///
/// Todo ids are checked globally, not per space.
pub fn validate_snapshot(spaces: &[Space]) -> Result<(), SnapshotError> {
    let mut space_ids = HashSet::with_capacity(spaces.len());
    let mut todo_ids = HashSet::new();

    for space in spaces {
        if space.id.is_nil() {
            return Err(SnapshotError::NilId);
        }
        if !space_ids.insert(space.id) {
            return Err(SnapshotError::DuplicateSpaceId(space.id));
        }
        for todo in &space.todos {
            if todo.id.is_nil() {
                return Err(SnapshotError::NilId);
            }
            if !todo_ids.insert(todo.id) {
                return Err(SnapshotError::DuplicateTodoId(todo.id));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_snapshot, SnapshotError, Space, Todo};
    use uuid::Uuid;

    #[test]
    fn new_space_is_empty_with_fresh_id() {
        let first = Space::new("Work");
        let second = Space::new("Work");

        assert!(first.todos.is_empty());
        assert!(!first.id.is_nil());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn completed_count_only_counts_done_items() {
        let mut space = Space::new("Home");
        space.todos.push(Todo::new("dishes"));
        let mut done = Todo::new("laundry");
        done.completed = true;
        space.todos.push(done);

        assert_eq!(space.completed_count(), 1);
    }

    #[test]
    fn validate_snapshot_rejects_todo_id_shared_across_spaces() {
        let shared = Uuid::new_v4();
        let mut work = Space::new("Work");
        work.todos.push(Todo::with_id(shared, "a"));
        let mut home = Space::new("Home");
        home.todos.push(Todo::with_id(shared, "b"));

        let err = validate_snapshot(&[work, home]).expect_err("shared todo id must be rejected");
        assert_eq!(err, SnapshotError::DuplicateTodoId(shared));
    }

    #[test]
    fn validate_snapshot_rejects_duplicate_space_id() {
        let space = Space::new("Work");
        let err = validate_snapshot(&[space.clone(), space.clone()])
            .expect_err("repeated space must be rejected");
        assert_eq!(err, SnapshotError::DuplicateSpaceId(space.id));
    }
}
