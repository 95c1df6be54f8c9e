//! Action dispatcher: user intents to state mutations.
//!
//! # Responsibility
//! - Translate add/toggle/edit/delete/clear intents into state store
//!   transitions.
//! - Gate destructive transitions on the completion of their exit animation.
//! - Mirror the space list to persistence while the flag is on.
//!
//! # Invariants
//! - A gated mutation is applied only after its `ExitCompletion` resolves,
//!   and it applies to the state current at that moment.
//! - At most one exit per target is in flight; repeats are ignored until the
//!   first one applies or its pending action is dropped.
//! - Reduced motion skips every animation and applies gated mutations without
//!   waiting.
//! - No intent ever fails: unknown ids and blank input are silent no-ops.

use crate::animation::{
    AnimationProfile, AnimationSequencer, AnimationTarget, ExitCompletion, ExitStatus,
};
use crate::input::{submission_for, InputFocus, Key, Submission};
use crate::model::space::{Space, SpaceId, Todo, TodoId};
use crate::service::persistence::PersistenceAdapter;
use crate::state::store::{StateStore, Transition};
use crate::state::{ops, AppState};
use futures::future::{self, FutureExt, LocalBoxFuture};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Behavior switches for one dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherOptions {
    /// Skip all animations and apply destructive actions immediately.
    pub reduced_motion: bool,
}

/// Result of a destructive (animation-gated) action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The mutation ran and changed state.
    Applied,
    /// The mutation ran but the target no longer existed.
    Unchanged,
    /// An exit for the same target was already in flight; nothing ran.
    Ignored,
}

/// Entry point for every user intent.
///
/// Cloning yields another handle to the same store; handles are meant for one
/// UI thread.
pub struct Dispatcher<P, A> {
    inner: Rc<Inner<P, A>>,
}

impl<P, A> Clone for Dispatcher<P, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<P, A> {
    store: RefCell<StateStore>,
    persistence: P,
    persistence_enabled: Cell<bool>,
    sequencer: A,
    options: DispatcherOptions,
    exits_in_flight: RefCell<HashSet<AnimationTarget>>,
}

impl<P: PersistenceAdapter, A> Inner<P, A> {
    fn commit<F>(&self, transition: F) -> Transition
    where
        F: FnOnce(&AppState) -> AppState,
    {
        let (result, snapshot) = {
            let mut store = self.store.borrow_mut();
            let result = store.apply(transition);
            (result, store.snapshot())
        };
        if result.spaces_changed && self.persistence_enabled.get() {
            self.persistence.save_spaces(snapshot.spaces());
        }
        result
    }
}

/// Claim on one exit target, released on completion or when the pending
/// action is dropped.
struct InFlightExit<P, A> {
    inner: Rc<Inner<P, A>>,
    target: AnimationTarget,
}

impl<P, A> Drop for InFlightExit<P, A> {
    fn drop(&mut self) {
        self.inner.exits_in_flight.borrow_mut().remove(&self.target);
    }
}

impl<P, A> Dispatcher<P, A>
where
    P: PersistenceAdapter + 'static,
    A: AnimationSequencer + 'static,
{
    /// Restores the persistence flag and, when it is on, the saved spaces.
    pub fn bootstrap(persistence: P, sequencer: A, options: DispatcherOptions) -> Self {
        let enabled = persistence.load_persistence_flag();
        let spaces = if enabled {
            persistence.load_spaces()
        } else {
            Vec::new()
        };
        info!(
            "event=dispatcher_bootstrap module=dispatcher status=ok persistence={enabled} spaces={} reduced_motion={}",
            spaces.len(),
            options.reduced_motion
        );

        Self {
            inner: Rc::new(Inner {
                store: RefCell::new(StateStore::new(AppState::from_spaces(spaces))),
                persistence,
                persistence_enabled: Cell::new(enabled),
                sequencer,
                options,
                exits_in_flight: RefCell::new(HashSet::new()),
            }),
        }
    }

    /// Plays the startup animations for the root and restored spaces.
    pub fn start(&self) {
        self.entrance(AnimationTarget::App, AnimationProfile::app_fade_in());
        if !self.state().is_empty() {
            self.entrance(
                AnimationTarget::AllSpaces,
                AnimationProfile::spaces_batch_entrance(),
            );
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> Rc<AppState> {
        self.inner.store.borrow().snapshot()
    }

    /// Increases on every state change; renderers compare it to skip redraws.
    pub fn revision(&self) -> u64 {
        self.inner.store.borrow().revision()
    }

    pub fn persistence_enabled(&self) -> bool {
        self.inner.persistence_enabled.get()
    }

    pub fn sequencer(&self) -> &A {
        &self.inner.sequencer
    }

    /// Whether an exit animation for `target` is still pending.
    pub fn is_exit_in_flight(&self, target: &AnimationTarget) -> bool {
        self.inner.exits_in_flight.borrow().contains(target)
    }

    pub fn set_space_name_input(&self, text: &str) {
        self.inner
            .commit(|state| ops::set_space_name_input(state, text));
    }

    pub fn set_todo_input(&self, space_id: SpaceId, text: &str) {
        self.inner
            .commit(|state| ops::set_todo_input(state, space_id, text));
    }

    /// Creates a space from the space-name buffer.
    ///
    /// Returns the new id, or `None` when the buffer is blank.
    pub fn add_space(&self) -> Option<SpaceId> {
        let space = Space::new(self.state().space_name_input());
        let space_id = space.id;

        let transition = self
            .inner
            .commit(move |state| ops::add_space_with(state, space));
        if !transition.spaces_changed {
            debug!("event=dispatch module=dispatcher status=skip action=add_space reason=blank_name");
            return None;
        }

        info!("event=dispatch module=dispatcher status=ok action=add_space space_id={space_id}");
        self.entrance(
            AnimationTarget::Space(space_id),
            AnimationProfile::space_entrance(),
        );
        Some(space_id)
    }

    /// Creates a todo in `space_id` from that space's buffer.
    ///
    /// Returns the new id, or `None` when the buffer is blank or the space is
    /// unknown.
    pub fn add_todo(&self, space_id: SpaceId) -> Option<TodoId> {
        let text = self.state().todo_input(space_id)?.to_string();
        let todo = Todo::new(text);
        let todo_id = todo.id;

        let transition = self
            .inner
            .commit(move |state| ops::add_todo_with(state, space_id, todo));
        if !transition.spaces_changed {
            debug!("event=dispatch module=dispatcher status=skip action=add_todo space_id={space_id} reason=blank_text");
            return None;
        }

        info!("event=dispatch module=dispatcher status=ok action=add_todo space_id={space_id} todo_id={todo_id}");
        self.entrance(
            AnimationTarget::LastTodoIn(space_id),
            AnimationProfile::todo_entrance(),
        );
        Some(todo_id)
    }

    /// Flips a todo's completed flag; returns whether anything changed.
    pub fn toggle_todo(&self, space_id: SpaceId, todo_id: TodoId) -> bool {
        let transition = self
            .inner
            .commit(|state| ops::toggle_todo(state, space_id, todo_id));
        if transition.changed {
            debug!("event=dispatch module=dispatcher status=ok action=toggle_todo todo_id={todo_id}");
            self.emphasis(AnimationTarget::Todo(todo_id), AnimationProfile::todo_pulse());
        }
        transition.changed
    }

    /// Replaces a todo's text verbatim; returns whether anything changed.
    pub fn edit_todo(&self, space_id: SpaceId, todo_id: TodoId, text: &str) -> bool {
        self.inner
            .commit(|state| ops::edit_todo(state, space_id, todo_id, text))
            .changed
    }

    /// Removes one todo after its exit animation.
    pub fn delete_todo(
        &self,
        space_id: SpaceId,
        todo_id: TodoId,
    ) -> LocalBoxFuture<'static, DispatchOutcome> {
        self.gated(
            "delete_todo",
            AnimationTarget::Todo(todo_id),
            AnimationProfile::todo_exit(),
            move |state| ops::delete_todo(state, space_id, todo_id),
        )
    }

    /// Removes one space and its buffer after its exit animation.
    pub fn delete_space(&self, space_id: SpaceId) -> LocalBoxFuture<'static, DispatchOutcome> {
        self.gated(
            "delete_space",
            AnimationTarget::Space(space_id),
            AnimationProfile::space_exit(),
            move |state| ops::delete_space(state, space_id),
        )
    }

    /// Empties one space after every todo row played its exit animation.
    pub fn clear_todos(&self, space_id: SpaceId) -> LocalBoxFuture<'static, DispatchOutcome> {
        self.gated(
            "clear_todos",
            AnimationTarget::TodosIn(space_id),
            AnimationProfile::todos_clear_exit(),
            move |state| ops::clear_todos(state, space_id),
        )
    }

    /// Removes every space after every card played its exit animation.
    pub fn clear_all_spaces(&self) -> LocalBoxFuture<'static, DispatchOutcome> {
        self.gated(
            "clear_all_spaces",
            AnimationTarget::AllSpaces,
            AnimationProfile::spaces_clear_exit(),
            ops::clear_all_spaces,
        )
    }

    /// Flips the persistence flag; returns the new value.
    pub fn toggle_persistence(&self) -> bool {
        let enabled = !self.persistence_enabled();
        self.set_persistence_enabled(enabled);
        enabled
    }

    /// Sets the persistence flag and stores it.
    ///
    /// Turning persistence on mirrors the current spaces immediately.
    pub fn set_persistence_enabled(&self, enabled: bool) {
        self.inner.persistence_enabled.set(enabled);
        self.inner.persistence.save_persistence_flag(enabled);
        if enabled {
            self.inner.persistence.save_spaces(self.state().spaces());
        }
        info!("event=persistence_toggle module=dispatcher status=ok enabled={enabled}");
        self.emphasis(
            AnimationTarget::PersistenceToggle,
            AnimationProfile::persistence_switch(enabled),
        );
    }

    /// Handles a key press on a focused input.
    ///
    /// Returns `true` when the key was intercepted as a submission.
    pub fn handle_key(&self, focus: InputFocus, key: Key) -> bool {
        match submission_for(focus, key) {
            Some(Submission::AddSpace) => {
                self.add_space();
                true
            }
            Some(Submission::AddTodo(space_id)) => {
                self.add_todo(space_id);
                true
            }
            None => false,
        }
    }

    fn gated<F>(
        &self,
        action: &'static str,
        target: AnimationTarget,
        profile: AnimationProfile,
        mutation: F,
    ) -> LocalBoxFuture<'static, DispatchOutcome>
    where
        F: FnOnce(&AppState) -> AppState + 'static,
    {
        if !self.inner.exits_in_flight.borrow_mut().insert(target) {
            debug!("event=dispatch module=dispatcher status=skip action={action} target={target} reason=exit_in_flight");
            return future::ready(DispatchOutcome::Ignored).boxed_local();
        }

        let guard = InFlightExit {
            inner: Rc::clone(&self.inner),
            target,
        };
        let completion = if self.inner.options.reduced_motion {
            ExitCompletion::immediate()
        } else {
            self.inner.sequencer.play_exit(&target, &profile)
        };

        async move {
            if completion.await == ExitStatus::Abandoned {
                warn!("event=dispatch module=dispatcher status=degraded action={action} target={target} reason=exit_abandoned");
            }
            let inner = Rc::clone(&guard.inner);
            let transition = inner.commit(mutation);
            drop(guard);
            inner.sequencer.notify_layout_changed();

            if transition.changed {
                info!("event=dispatch module=dispatcher status=ok action={action} target={target}");
                DispatchOutcome::Applied
            } else {
                debug!("event=dispatch module=dispatcher status=skip action={action} target={target} reason=unknown_id");
                DispatchOutcome::Unchanged
            }
        }
        .boxed_local()
    }

    fn entrance(&self, target: AnimationTarget, profile: AnimationProfile) {
        if !self.inner.options.reduced_motion {
            self.inner.sequencer.play_entrance(&target, &profile);
        }
    }

    fn emphasis(&self, target: AnimationTarget, profile: AnimationProfile) {
        if !self.inner.options.reduced_motion {
            self.inner.sequencer.play_emphasis(&target, &profile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchOutcome, Dispatcher, DispatcherOptions};
    use crate::animation::ImmediateSequencer;
    use crate::input::{InputFocus, Key};
    use crate::repo::kv_repo::MemoryKvStore;
    use crate::service::persistence::KvPersistence;
    use futures::executor::block_on;

    fn dispatcher() -> Dispatcher<KvPersistence<MemoryKvStore>, ImmediateSequencer> {
        Dispatcher::bootstrap(
            KvPersistence::new(MemoryKvStore::new()),
            ImmediateSequencer,
            DispatcherOptions::default(),
        )
    }

    #[test]
    fn work_space_scenario() {
        let dispatcher = dispatcher();
        dispatcher.set_space_name_input("Work");
        let work = dispatcher.add_space().expect("space should be created");
        dispatcher.set_todo_input(work, "Write spec");
        let todo = dispatcher.add_todo(work).expect("todo should be created");

        let state = dispatcher.state();
        assert_eq!(state.spaces().len(), 1);
        assert_eq!(state.spaces()[0].name, "Work");
        let item = state.todo(work, todo).expect("todo should exist");
        assert_eq!(item.text, "Write spec");
        assert!(!item.completed);

        assert!(dispatcher.toggle_todo(work, todo));
        assert!(dispatcher.state().todo(work, todo).expect("todo should exist").completed);
        assert!(dispatcher.toggle_todo(work, todo));
        assert!(!dispatcher.state().todo(work, todo).expect("todo should exist").completed);
    }

    #[test]
    fn enter_key_submits_focused_field() {
        let dispatcher = dispatcher();
        dispatcher.set_space_name_input("Home");
        assert!(dispatcher.handle_key(InputFocus::SpaceName, Key::Enter));
        let home = dispatcher.state().spaces()[0].id;

        dispatcher.set_todo_input(home, "Dishes");
        assert!(!dispatcher.handle_key(InputFocus::TodoText(home), Key::Char('x')));
        assert!(dispatcher.state().space(home).expect("space should exist").todos.is_empty());
        assert!(dispatcher.handle_key(InputFocus::TodoText(home), Key::Enter));
        assert_eq!(dispatcher.state().space(home).expect("space should exist").todos.len(), 1);
    }

    #[test]
    fn blank_buffers_do_not_create_items() {
        let dispatcher = dispatcher();
        dispatcher.set_space_name_input("   ");
        assert_eq!(dispatcher.add_space(), None);
        assert!(dispatcher.state().is_empty());
    }

    #[test]
    fn immediate_sequencer_applies_deletes_on_first_poll() {
        let dispatcher = dispatcher();
        dispatcher.set_space_name_input("Work");
        let work = dispatcher.add_space().expect("space should be created");

        assert_eq!(block_on(dispatcher.delete_space(work)), DispatchOutcome::Applied);
        assert!(dispatcher.state().is_empty());
        assert_eq!(
            block_on(dispatcher.delete_space(work)),
            DispatchOutcome::Unchanged
        );
    }

    #[test]
    fn dropping_unpolled_delete_does_not_lock_target() {
        let dispatcher = dispatcher();
        dispatcher.set_space_name_input("Work");
        let work = dispatcher.add_space().expect("space should be created");

        drop(dispatcher.delete_space(work));
        assert_eq!(block_on(dispatcher.delete_space(work)), DispatchOutcome::Applied);
        assert!(dispatcher.state().is_empty());
    }
}
