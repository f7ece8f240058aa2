//! Role-to-permission mapping definitions.

use std::collections::{BTreeSet, HashMap};

use yardstock_entity::permission::Permission;
use yardstock_entity::user::UserRole;

static NO_PERMISSIONS: BTreeSet<Permission> = BTreeSet::new();

/// Immutable mapping from each role to its base permission set.
///
/// Built once at startup and shared behind an `Arc` by the tenant and
/// permission resolvers. There is no way to mutate a table after
/// [`PermissionTableBuilder::build`].
#[derive(Debug, Clone)]
pub struct PermissionTable {
    /// Role → set of permissions.
    roles: HashMap<UserRole, BTreeSet<Permission>>,
    /// Added to every synthesized enterprise grant.
    enterprise: BTreeSet<Permission>,
}

impl PermissionTable {
    /// Start an empty table.
    pub fn builder() -> PermissionTableBuilder {
        PermissionTableBuilder::default()
    }

    /// The base permissions of `role`.
    pub fn permissions_for(&self, role: UserRole) -> &BTreeSet<Permission> {
        self.roles.get(&role).unwrap_or(&NO_PERMISSIONS)
    }

    /// Whether `role` carries `permission` from the table alone.
    pub fn role_grants(&self, role: UserRole, permission: Permission) -> bool {
        self.permissions_for(role).contains(&permission)
    }

    /// Grants every enterprise user receives regardless of role.
    pub fn enterprise_grants(&self) -> &BTreeSet<Permission> {
        &self.enterprise
    }

    /// Human-readable description of a permission.
    pub fn describe(&self, permission: Permission) -> &'static str {
        permission.description()
    }
}

impl Default for PermissionTable {
    /// The standard yard hierarchy: each tier includes the one below it.
    fn default() -> Self {
        use Permission::*;

        let customer_contact = [ViewInventory, ViewWorkOrders, CreateWorkOrders];
        let operator = [
            CreateInventory,
            EditInventory,
            EditWorkOrders,
            ViewCustomers,
            ViewTransport,
            ManageTransport,
        ];
        let manager = [
            DeleteInventory,
            ApproveWorkOrders,
            DeleteWorkOrders,
            ManageCustomers,
            ViewUsers,
            ExportData,
        ];
        let admin = [ManageUsers];

        PermissionTable::builder()
            .grant(UserRole::CustomerContact, customer_contact)
            .grant(UserRole::Operator, customer_contact)
            .grant(UserRole::Operator, operator)
            .grant(UserRole::Manager, customer_contact)
            .grant(UserRole::Manager, operator)
            .grant(UserRole::Manager, manager)
            .grant(UserRole::Admin, customer_contact)
            .grant(UserRole::Admin, operator)
            .grant(UserRole::Admin, manager)
            .grant(UserRole::Admin, admin)
            .grant(UserRole::EnterpriseAdmin, Permission::ALL)
            .grant(UserRole::SystemAdmin, Permission::ALL)
            .enterprise_grants([ViewCrossTenant, ManageUsers])
            .build()
    }
}

/// Accumulates role grants before freezing them into a [`PermissionTable`].
#[derive(Debug, Default)]
pub struct PermissionTableBuilder {
    roles: HashMap<UserRole, BTreeSet<Permission>>,
    enterprise: BTreeSet<Permission>,
}

impl PermissionTableBuilder {
    /// Add permissions to a role.
    pub fn grant(
        mut self,
        role: UserRole,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.roles.entry(role).or_default().extend(permissions);
        self
    }

    /// Set the permissions added to synthesized enterprise grants.
    pub fn enterprise_grants(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.enterprise = permissions.into_iter().collect();
        self
    }

    pub fn build(self) -> PermissionTable {
        PermissionTable {
            roles: self.roles,
            enterprise: self.enterprise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_nested() {
        let table = PermissionTable::default();
        let chain = [
            UserRole::CustomerContact,
            UserRole::Operator,
            UserRole::Manager,
            UserRole::Admin,
            UserRole::EnterpriseAdmin,
        ];
        for pair in chain.windows(2) {
            let lower = table.permissions_for(pair[0]);
            let upper = table.permissions_for(pair[1]);
            assert!(lower.is_subset(upper), "{} ⊄ {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_specific_grants() {
        let table = PermissionTable::default();
        assert!(table.role_grants(UserRole::CustomerContact, Permission::CreateWorkOrders));
        assert!(!table.role_grants(UserRole::CustomerContact, Permission::EditInventory));
        assert!(!table.role_grants(UserRole::Manager, Permission::ManageUsers));
        assert!(table.role_grants(UserRole::Admin, Permission::ManageUsers));
        assert!(!table.role_grants(UserRole::Admin, Permission::ViewCrossTenant));
        assert_eq!(
            table.permissions_for(UserRole::SystemAdmin).len(),
            Permission::ALL.len()
        );
    }

    #[test]
    fn test_custom_table() {
        let table = PermissionTable::builder()
            .grant(UserRole::Operator, [Permission::ViewInventory])
            .build();
        assert!(table.role_grants(UserRole::Operator, Permission::ViewInventory));
        assert!(table.permissions_for(UserRole::Manager).is_empty());
        assert!(table.enterprise_grants().is_empty());
    }

    #[test]
    fn test_enterprise_grants() {
        let table = PermissionTable::default();
        assert!(table.enterprise_grants().contains(&Permission::ViewCrossTenant));
        assert!(table.enterprise_grants().contains(&Permission::ManageUsers));
        assert_eq!(
            table.describe(Permission::ExportData),
            "Export data to files"
        );
    }
}
