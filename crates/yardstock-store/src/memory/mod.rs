//! Concurrent in-memory store backed by `DashMap`.
//!
//! Suitable for tests, single-node deployments, and as the reference
//! behaviour for durable backends.

pub mod session;
pub mod user;

pub use session::MemorySessionStore;
pub use user::MemoryUserStore;
