//! Per-tenant grants embedded in a user.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use yardstock_core::types::TenantId;

use crate::error::EntityError;
use crate::permission::Permission;
use crate::user::UserRole;

use super::yard::YardAccess;

/// Broad operation classes gated by the tenant access flags,
/// independent of the fine-grained permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Read,
    Write,
    Delete,
    Approve,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Approve => "approve",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The grant a user holds in one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantAccess {
    /// Tenant this grant applies to; unique within one user's access list.
    pub tenant_id: TenantId,
    /// Role inside this tenant; may differ from the user's top-level role.
    pub role: UserRole,
    /// Explicit permissions added on top of the role table. Additive only.
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    /// Yard-level grants, in configuration order.
    #[serde(default)]
    pub yard_access: Vec<YardAccess>,
    pub can_read: bool,
    pub can_write: bool,
    pub can_delete: bool,
    pub can_approve: bool,
}

impl TenantAccess {
    /// A read-only grant with no overrides and no yard access.
    pub fn new(tenant_id: impl Into<TenantId>, role: UserRole) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            role,
            permissions: BTreeSet::new(),
            yard_access: Vec::new(),
            can_read: true,
            can_write: false,
            can_delete: false,
            can_approve: false,
        }
    }

    /// Builder: add an explicit permission override.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Builder: append a yard grant.
    pub fn with_yard(mut self, yard: YardAccess) -> Self {
        self.yard_access.push(yard);
        self
    }

    /// Builder: set all four capability flags at once.
    pub fn with_capabilities(mut self, read: bool, write: bool, delete: bool, approve: bool) -> Self {
        self.can_read = read;
        self.can_write = write;
        self.can_delete = delete;
        self.can_approve = approve;
        self
    }

    /// Whether the broad operation class is enabled for this grant.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Read => self.can_read,
            Capability::Write => self.can_write,
            Capability::Delete => self.can_delete,
            Capability::Approve => self.can_approve,
        }
    }

    /// Find the yard grant by exact location match.
    pub fn yard(&self, yard_location: &str) -> Option<&YardAccess> {
        self.yard_access
            .iter()
            .find(|y| y.yard_location == yard_location)
    }

    /// Replace the grant for the yard with the same location, or append it.
    pub fn upsert_yard(&mut self, yard: YardAccess) {
        match self
            .yard_access
            .iter_mut()
            .find(|y| y.yard_location == yard.yard_location)
        {
            Some(existing) => *existing = yard,
            None => self.yard_access.push(yard),
        }
    }

    /// Check tenant id, yard uniqueness, and every yard grant.
    pub fn validate(&self) -> Result<(), EntityError> {
        if self.tenant_id.is_empty() {
            return Err(EntityError::EmptyTenant);
        }

        let mut seen = HashSet::new();
        for yard in &self.yard_access {
            yard.validate()?;
            if !seen.insert(yard.yard_location.as_str()) {
                return Err(EntityError::DuplicateYard {
                    tenant_id: self.tenant_id.clone(),
                    yard: yard.yard_location.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::YardPermission;

    fn houston() -> TenantAccess {
        TenantAccess::new("houston", UserRole::Operator)
            .with_yard(YardAccess::with_permissions(
                "houston_north",
                &[YardPermission::ViewInventory],
            ))
    }

    #[test]
    fn test_yard_lookup_is_exact() {
        let access = houston();
        assert!(access.yard("houston_north").is_some());
        assert!(access.yard("houston_North").is_none());
        assert!(access.yard("houston").is_none());
    }

    #[test]
    fn test_duplicate_yard_rejected() {
        let access = houston().with_yard(YardAccess::with_permissions(
            "houston_north",
            &[YardPermission::ExportData],
        ));
        assert!(matches!(
            access.validate(),
            Err(EntityError::DuplicateYard { .. })
        ));
    }

    #[test]
    fn test_upsert_yard_replaces() {
        let mut access = houston();
        access.upsert_yard(YardAccess::with_permissions(
            "houston_north",
            &[YardPermission::ExportData],
        ));
        assert_eq!(access.yard_access.len(), 1);
        assert!(access.yard_access[0].can_export_data);
        assert!(!access.yard_access[0].can_view_inventory);
    }

    #[test]
    fn test_capability_flags() {
        let access = houston().with_capabilities(true, true, false, false);
        assert!(access.allows(Capability::Write));
        assert!(!access.allows(Capability::Delete));
    }
}
