//! Tenant context resolution.

pub mod resolver;

pub use resolver::{AccessSource, ResolvedTenant, TenantAccessResolver};
