//! Computes the effective tenant grant for a request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use yardstock_core::types::TenantId;
use yardstock_entity::access::TenantAccess;
use yardstock_entity::user::{User, UserRole};

use crate::error::{AuthError, AuthResult};
use crate::rbac::PermissionTable;

/// Where a resolved grant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSource {
    /// Synthesized from the user's global enterprise status.
    Enterprise,
    /// Looked up in the user's tenant access list.
    Grant,
}

/// The tenant a request acts in and the grant that applies there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTenant {
    pub tenant_id: TenantId,
    pub access: TenantAccess,
    pub source: AccessSource,
}

/// Resolves `(user, requested tenant)` into an effective [`TenantAccess`].
///
/// Enterprise users get a synthesized grant for any tenant. Everyone else
/// is allow-listed: only an exact `tenant_id` match in their access list
/// counts.
#[derive(Debug, Clone)]
pub struct TenantAccessResolver {
    table: Arc<PermissionTable>,
}

impl TenantAccessResolver {
    pub fn new(table: Arc<PermissionTable>) -> Self {
        Self { table }
    }

    /// Resolve the tenant context. An absent or empty request falls back
    /// to the user's primary tenant.
    pub fn resolve(&self, user: &User, requested: Option<&TenantId>) -> AuthResult<ResolvedTenant> {
        let tenant_id = requested
            .filter(|t| !t.is_empty())
            .unwrap_or(&user.primary_tenant_id)
            .clone();

        if user.has_enterprise_access() {
            let access = self.synthesize(user, &tenant_id);
            return Ok(ResolvedTenant {
                tenant_id,
                access,
                source: AccessSource::Enterprise,
            });
        }

        match user.tenant_access_for(&tenant_id) {
            Some(access) => Ok(ResolvedTenant {
                access: access.clone(),
                tenant_id,
                source: AccessSource::Grant,
            }),
            None => Err(AuthError::TenantAccessDenied { tenant_id }),
        }
    }

    fn synthesize(&self, user: &User, tenant_id: &TenantId) -> TenantAccess {
        let mut permissions = self.table.permissions_for(user.role).clone();
        permissions.extend(self.table.enterprise_grants().iter().copied());

        let mutating = !user.role.is_customer_contact();
        let delete = matches!(user.role, UserRole::EnterpriseAdmin | UserRole::SystemAdmin);

        TenantAccess {
            tenant_id: tenant_id.clone(),
            role: user.role,
            permissions,
            yard_access: Vec::new(),
            can_read: true,
            can_write: mutating,
            can_delete: delete,
            can_approve: mutating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use yardstock_core::types::UserId;
    use yardstock_entity::permission::Permission;
    use yardstock_entity::user::CreateUser;

    fn user(role: UserRole, enterprise: bool, grants: Vec<TenantAccess>) -> User {
        CreateUser {
            username: "u".into(),
            email: "u@example.com".into(),
            password_hash: String::new(),
            role,
            is_enterprise_user: enterprise,
            primary_tenant_id: TenantId::from("houston"),
            customer_id: None,
            contact_type: None,
            is_active: true,
            tenant_access: grants,
        }
        .into_user(UserId(1), Utc::now())
    }

    fn resolver() -> TenantAccessResolver {
        TenantAccessResolver::new(Arc::new(PermissionTable::default()))
    }

    #[test]
    fn test_enterprise_resolves_any_tenant() {
        let admin = user(UserRole::EnterpriseAdmin, true, Vec::new());
        for tenant in ["houston", "dallas", "never-granted"] {
            let resolved = resolver()
                .resolve(&admin, Some(&TenantId::from(tenant)))
                .unwrap();
            assert_eq!(resolved.tenant_id.as_str(), tenant);
            assert_eq!(resolved.source, AccessSource::Enterprise);
            assert!(resolved.access.yard_access.is_empty());
            assert!(resolved.access.can_delete);
            assert!(resolved.access.permissions.contains(&Permission::ViewCrossTenant));
        }
    }

    #[test]
    fn test_enterprise_flag_on_plain_role() {
        let manager = user(UserRole::Manager, true, Vec::new());
        let resolved = resolver()
            .resolve(&manager, Some(&TenantId::from("dallas")))
            .unwrap();
        assert_eq!(resolved.access.role, UserRole::Manager);
        assert!(resolved.access.can_write);
        assert!(resolved.access.can_approve);
        assert!(!resolved.access.can_delete);
        assert!(resolved.access.permissions.contains(&Permission::ManageUsers));
    }

    #[test]
    fn test_allow_list_isolation() {
        let operator = user(
            UserRole::Operator,
            false,
            vec![TenantAccess::new("houston", UserRole::Operator)],
        );
        for tenant in ["dallas", "Houston", "houston ", "austin"] {
            let err = resolver()
                .resolve(&operator, Some(&TenantId::from(tenant)))
                .unwrap_err();
            assert!(matches!(err, AuthError::TenantAccessDenied { .. }));
        }
    }

    #[test]
    fn test_empty_request_uses_primary_tenant() {
        let operator = user(
            UserRole::Operator,
            false,
            vec![TenantAccess::new("houston", UserRole::Manager)],
        );
        let resolved = resolver()
            .resolve(&operator, Some(&TenantId::from("")))
            .unwrap();
        assert_eq!(resolved.tenant_id.as_str(), "houston");
        assert_eq!(resolved.access.role, UserRole::Manager);
        assert_eq!(resolved.source, AccessSource::Grant);

        assert!(resolver().resolve(&operator, None).is_ok());
    }
}
