//! Shared value types.

pub mod id;

pub use id::{CustomerId, SessionId, TenantId, UserId};
