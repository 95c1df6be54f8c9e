//! Core use-case services.
//!
//! # Responsibility
//! - Sequence user intents against the state store and animations.
//! - Keep hosts decoupled from storage and encoding details.

pub mod dispatcher;
pub mod persistence;
