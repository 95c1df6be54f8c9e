//! Space/todo domain model.
//!
//! # Responsibility
//! - Define the data structures owned by the state store.
//! - Validate restored snapshots before they enter the store.
//!
//! # Invariants
//! - Every space and todo is identified by a stable UUID.
//! - Deletion is a hard removal; there are no tombstones.

pub mod space;
