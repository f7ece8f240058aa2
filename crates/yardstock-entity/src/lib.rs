//! # yardstock-entity
//!
//! Domain entity models for the Yardstock identity engine. Users embed
//! their per-tenant grants; sessions carry a point-in-time snapshot of the
//! grant they were issued under. All entities derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.

pub mod access;
pub mod error;
pub mod permission;
pub mod session;
pub mod user;

pub use access::{Capability, TenantAccess, YardAccess, YardPermission};
pub use error::EntityError;
pub use permission::{Permission, PermissionFamily};
pub use session::{Session, SessionState};
pub use user::{ContactType, CreateUser, User, UserRole};
