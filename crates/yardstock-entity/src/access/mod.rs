//! Tenant and yard grants.

pub mod tenant;
pub mod yard;

pub use tenant::{Capability, TenantAccess};
pub use yard::{YardAccess, YardPermission};
