//! Role table and permission resolution.

pub mod policies;
pub mod resolver;

pub use policies::{PermissionTable, PermissionTableBuilder};
pub use resolver::{CustomerScope, PermissionResolver};
