//! Session lifecycle management.

pub mod cleanup;
pub mod manager;

pub use cleanup::SessionCleanup;
pub use manager::{AuthContext, ClientInfo, IssuedSession, SessionManager};
