//! # yardstock-store
//!
//! The persistence contract consumed by the authentication engine and a
//! concurrent in-memory implementation of it.
//!
//! Reads return `Ok(None)` when a record does not exist, so "not found"
//! is always distinguishable from a store failure. Implementations own
//! their locking: every mutation of a single session must be an atomic
//! read-modify-write on that session's key.

pub mod memory;
pub mod traits;

pub use memory::{MemorySessionStore, MemoryUserStore};
pub use traits::{SessionStore, UserStore};
