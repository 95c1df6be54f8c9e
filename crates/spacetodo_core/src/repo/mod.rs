//! Durable key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Model the browser-style local storage the application mirrors into.
//! - Isolate SQLite details from the persistence adapter.
//!
//! # Invariants
//! - Values are opaque strings; encoding belongs to callers.
//! - `set` overwrites; `remove` of a missing key is not an error.

pub mod kv_repo;
