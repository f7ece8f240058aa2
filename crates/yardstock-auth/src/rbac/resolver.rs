//! Permission and yard-level access checks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use yardstock_core::config::EnterpriseYardPolicy;
use yardstock_core::types::{CustomerId, TenantId};
use yardstock_entity::access::{Capability, TenantAccess, YardPermission};
use yardstock_entity::permission::Permission;
use yardstock_entity::user::{ContactType, User};

use crate::error::{AuthError, AuthResult};
use crate::tenant::TenantAccessResolver;

use super::policies::PermissionTable;

/// The single customer a customer contact is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerScope {
    pub customer_id: CustomerId,
    pub contact_type: Option<ContactType>,
}

/// Answers "may this user do X in tenant T (at yard Y)?".
///
/// Every granting source is OR-ed: system admin, the role table for the
/// tenant role, and the explicit per-tenant overrides. Overrides only ever
/// add permissions.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    table: Arc<PermissionTable>,
    tenants: TenantAccessResolver,
    yard_policy: EnterpriseYardPolicy,
}

impl PermissionResolver {
    pub fn new(table: Arc<PermissionTable>, yard_policy: EnterpriseYardPolicy) -> Self {
        Self {
            tenants: TenantAccessResolver::new(Arc::clone(&table)),
            table,
            yard_policy,
        }
    }

    /// The tenant resolver sharing this resolver's table.
    pub fn tenants(&self) -> &TenantAccessResolver {
        &self.tenants
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    pub fn yard_policy(&self) -> EnterpriseYardPolicy {
        self.yard_policy
    }

    /// Check `permission` in `tenant_id`, resolving the tenant grant live.
    pub fn has_permission(&self, user: &User, tenant_id: &TenantId, permission: Permission) -> bool {
        if user.is_system_admin() {
            return true;
        }
        match self.tenants.resolve(user, Some(tenant_id)) {
            Ok(resolved) => self.access_grants(user, &resolved.access, permission),
            Err(_) => false,
        }
    }

    /// Check `permission` against an already resolved or snapshotted grant.
    pub fn access_grants(&self, user: &User, access: &TenantAccess, permission: Permission) -> bool {
        user.is_system_admin()
            || self.table.role_grants(access.role, permission)
            || access.permissions.contains(&permission)
    }

    /// Check a yard-level permission, resolving the tenant grant live.
    pub fn has_yard_permission(
        &self,
        user: &User,
        tenant_id: &TenantId,
        yard: &str,
        permission: YardPermission,
    ) -> bool {
        if user.is_system_admin() {
            return true;
        }
        if self.enterprise_yard_bypass(user, tenant_id) {
            return true;
        }
        explicit_yard_grant(user, tenant_id, yard, permission)
    }

    /// Yard check against a session snapshot.
    pub fn snapshot_has_yard_permission(
        &self,
        user: &User,
        access: &TenantAccess,
        yard: &str,
        permission: YardPermission,
    ) -> bool {
        if user.is_system_admin() {
            return true;
        }
        if self.enterprise_yard_bypass(user, &access.tenant_id) {
            return true;
        }
        if user.has_enterprise_access() {
            // Synthesized snapshots carry no yards; the explicit entry does.
            return explicit_yard_grant(user, &access.tenant_id, yard, permission);
        }
        access
            .yard(yard)
            .is_some_and(|grant| grant.allows(permission))
    }

    /// Under [`EnterpriseYardPolicy::Blanket`], an enterprise user holding
    /// any explicit entry for the tenant skips yard grants there.
    fn enterprise_yard_bypass(&self, user: &User, tenant_id: &TenantId) -> bool {
        self.yard_policy == EnterpriseYardPolicy::Blanket
            && user.has_enterprise_access()
            && user.tenant_access_for(tenant_id).is_some()
    }

    pub fn require_permission(
        &self,
        user: &User,
        tenant_id: &TenantId,
        permission: Permission,
    ) -> AuthResult<()> {
        if self.has_permission(user, tenant_id, permission) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied {
                permission: permission.to_string(),
            })
        }
    }

    pub fn require_yard_permission(
        &self,
        user: &User,
        tenant_id: &TenantId,
        yard: &str,
        permission: YardPermission,
    ) -> AuthResult<()> {
        if self.has_yard_permission(user, tenant_id, yard, permission) {
            Ok(())
        } else {
            Err(AuthError::YardAccessDenied {
                yard: yard.to_string(),
            })
        }
    }

    /// Check one of the broad capability flags on a grant.
    pub fn require_capability(
        &self,
        user: &User,
        access: &TenantAccess,
        capability: Capability,
    ) -> AuthResult<()> {
        if user.is_system_admin() || access.allows(capability) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied {
                permission: capability.to_string(),
            })
        }
    }

    pub fn require_enterprise(&self, user: &User) -> AuthResult<()> {
        if user.has_enterprise_access() {
            Ok(())
        } else {
            Err(AuthError::EnterpriseAccessRequired)
        }
    }

    /// The customer a customer contact is scoped to.
    pub fn customer_scope(&self, user: &User) -> AuthResult<CustomerScope> {
        match (user.role.is_customer_contact(), user.customer_id) {
            (true, Some(customer_id)) => Ok(CustomerScope {
                customer_id,
                contact_type: user.contact_type,
            }),
            _ => Err(AuthError::NotCustomerContact),
        }
    }

    /// Deny a customer contact acting on another customer's data. Staff
    /// users are governed by their tenant permissions instead.
    pub fn require_customer(&self, user: &User, customer_id: CustomerId) -> AuthResult<()> {
        match self.customer_scope(user) {
            Ok(scope) if scope.customer_id != customer_id => Err(AuthError::PermissionDenied {
                permission: format!("customer:{customer_id}"),
            }),
            _ => Ok(()),
        }
    }
}

fn explicit_yard_grant(
    user: &User,
    tenant_id: &TenantId,
    yard: &str,
    permission: YardPermission,
) -> bool {
    user.tenant_access_for(tenant_id)
        .and_then(|access| access.yard(yard))
        .is_some_and(|grant| grant.allows(permission))
}
