//! Text rendering of a state snapshot.

use spacetodo_core::AppState;
use std::fmt::Write;

/// Renders every space and todo with the 1-based indices commands expect.
pub fn render(state: &AppState, persistence_enabled: bool) -> String {
    let mut out = String::new();
    let persistence = if persistence_enabled { "on" } else { "off" };
    let _ = writeln!(out, "local storage: {persistence}");

    if state.is_empty() {
        out.push_str("(no spaces)\n");
        return out;
    }

    for (space_index, space) in state.spaces().iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({}/{})",
            space_index + 1,
            space.name,
            space.completed_count(),
            space.todos.len()
        );
        for (todo_index, todo) in space.todos.iter().enumerate() {
            let mark = if todo.completed { 'x' } else { ' ' };
            let _ = writeln!(out, "   {}. [{mark}] {}", todo_index + 1, todo.text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render;
    use spacetodo_core::state::ops;
    use spacetodo_core::AppState;

    #[test]
    fn renders_indices_and_completion() {
        let state = ops::add_space(&AppState::new(), "Work");
        let work = state.spaces()[0].id;
        let state = ops::add_todo(&state, work, "Write spec");
        let state = ops::add_todo(&state, work, "Review");
        let first = state.spaces()[0].todos[0].id;
        let state = ops::toggle_todo(&state, work, first);

        let text = render(&state, true);
        assert_eq!(
            text,
            "local storage: on\n1. Work (1/2)\n   1. [x] Write spec\n   2. [ ] Review\n"
        );
    }

    #[test]
    fn renders_placeholder_when_empty() {
        assert_eq!(
            render(&AppState::new(), false),
            "local storage: off\n(no spaces)\n"
        );
    }
}
