//! Keyboard submission mapping.

use crate::model::space::SpaceId;

/// Input element holding keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    /// New-space name field.
    SpaceName,
    /// New-todo field of one space.
    TodoText(SpaceId),
    /// Anything else (todo editors, buttons, nothing).
    Other,
}

/// Key pressed while an input had focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
    Other,
}

/// Submission a key press maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    AddSpace,
    AddTodo(SpaceId),
}

/// Maps a key press to a submission; only Enter on a creation field maps.
pub fn submission_for(focus: InputFocus, key: Key) -> Option<Submission> {
    match (key, focus) {
        (Key::Enter, InputFocus::SpaceName) => Some(Submission::AddSpace),
        (Key::Enter, InputFocus::TodoText(space_id)) => Some(Submission::AddTodo(space_id)),
        _ => None,
    }
}
