//! Animation sequencing collaborators.
//!
//! # Responsibility
//! - Describe what to animate (`AnimationTarget`) and how (`AnimationProfile`).
//! - Define the sequencer seam through which exit animations gate removals.
//!
//! # Invariants
//! - Exit completion is delivered asynchronously through `ExitCompletion`,
//!   never by polling state.

pub mod profile;
pub mod sequencer;

pub use profile::{AnimationProfile, AnimationTarget, Direction, Easing};
pub use sequencer::{AnimationSequencer, ExitCompletion, ExitSignal, ExitStatus, ImmediateSequencer};
