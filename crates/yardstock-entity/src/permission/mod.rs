//! Permission catalogue.

pub mod model;

pub use model::{Permission, PermissionFamily};
