//! Pure state transitions.
//!
//! # Responsibility
//! - Provide the complete mutation set over `AppState`.
//! - Return a new snapshot for every call; the input is never modified.
//!
//! # Invariants
//! - Unknown space/todo ids are silent no-ops (the returned state equals the
//!   input).
//! - Blank names and blank todo text are silent no-ops on creation.
//! - Creation stores trimmed text; `edit_todo` stores text verbatim.

use super::AppState;
use crate::model::space::{Space, SpaceId, Todo, TodoId};

/// Appends a new empty space named `trim(name)`.
///
/// On success the space-name buffer is reset and a todo buffer is created for
/// the new space.
pub fn add_space(state: &AppState, name: &str) -> AppState {
    add_space_with(state, Space::new(name.trim()))
}

/// Same as [`add_space`] with a caller-provided space record.
///
/// The record is rejected (no-op) when its trimmed name is blank or its id is
/// already taken.
pub fn add_space_with(state: &AppState, space: Space) -> AppState {
    let name = space.name.trim().to_string();
    if name.is_empty() || state.space(space.id).is_some() {
        return state.clone();
    }

    let mut next = state.clone();
    next.create_space(Space { name, ..space });
    next.space_name_input.clear();
    next
}

/// Appends an open todo with `trim(text)` to `space_id` and resets that
/// space's buffer.
pub fn add_todo(state: &AppState, space_id: SpaceId, text: &str) -> AppState {
    add_todo_with(state, space_id, Todo::new(text.trim()))
}

/// Same as [`add_todo`] with a caller-provided todo record.
pub fn add_todo_with(state: &AppState, space_id: SpaceId, todo: Todo) -> AppState {
    let text = todo.text.trim().to_string();
    if text.is_empty() || state.space(space_id).is_none() {
        return state.clone();
    }
    if state
        .spaces
        .iter()
        .any(|space| space.todo(todo.id).is_some())
    {
        return state.clone();
    }

    let mut next = state.clone();
    let todo = Todo {
        text,
        completed: false,
        ..todo
    };
    if let Some(space) = next.space_mut(space_id) {
        space.todos.push(todo);
    }
    next.todo_inputs.insert(space_id, String::new());
    next
}

/// Flips `completed` on one todo.
pub fn toggle_todo(state: &AppState, space_id: SpaceId, todo_id: TodoId) -> AppState {
    let mut next = state.clone();
    if let Some(todo) = next.todo_mut(space_id, todo_id) {
        todo.completed = !todo.completed;
    }
    next
}

/// Replaces todo text verbatim. Empty text is allowed.
pub fn edit_todo(state: &AppState, space_id: SpaceId, todo_id: TodoId, text: &str) -> AppState {
    let mut next = state.clone();
    if let Some(todo) = next.todo_mut(space_id, todo_id) {
        todo.text = text.to_string();
    }
    next
}

/// Removes one todo from its space.
pub fn delete_todo(state: &AppState, space_id: SpaceId, todo_id: TodoId) -> AppState {
    let mut next = state.clone();
    if let Some(space) = next.space_mut(space_id) {
        space.todos.retain(|todo| todo.id != todo_id);
    }
    next
}

/// Removes one space and its todo buffer.
pub fn delete_space(state: &AppState, space_id: SpaceId) -> AppState {
    let mut next = state.clone();
    next.remove_space(space_id);
    next
}

/// Empties one space's todo list. The space and its buffer stay.
pub fn clear_todos(state: &AppState, space_id: SpaceId) -> AppState {
    let mut next = state.clone();
    if let Some(space) = next.space_mut(space_id) {
        space.todos.clear();
    }
    next
}

/// Removes every space and every todo buffer.
///
/// The space-name buffer belongs to no space and is kept.
pub fn clear_all_spaces(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.spaces.clear();
    next.todo_inputs.clear();
    next
}

/// Replaces the space-name buffer.
pub fn set_space_name_input(state: &AppState, text: &str) -> AppState {
    let mut next = state.clone();
    next.space_name_input = text.to_string();
    next
}

/// Replaces the todo buffer of one space; ignored for unknown spaces.
pub fn set_todo_input(state: &AppState, space_id: SpaceId, text: &str) -> AppState {
    let mut next = state.clone();
    if let Some(buffer) = next.todo_inputs.get_mut(&space_id) {
        *buffer = text.to_string();
    }
    next
}
