//! The closed permission catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tenant-scoped permission.
///
/// Permissions are never composed by end users; they reach a user only
/// through the role table or an explicit per-tenant override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Inventory
    ViewInventory,
    CreateInventory,
    EditInventory,
    DeleteInventory,

    // Work orders
    ViewWorkOrders,
    CreateWorkOrders,
    EditWorkOrders,
    ApproveWorkOrders,
    DeleteWorkOrders,

    // Customers
    ViewCustomers,
    ManageCustomers,

    // Transport
    ViewTransport,
    ManageTransport,

    // User management
    ViewUsers,
    ManageUsers,

    // Cross-tenant
    ViewCrossTenant,
    ManageCrossTenant,

    // Data export
    ExportData,
}

/// Grouping used for documentation and admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionFamily {
    Inventory,
    WorkOrder,
    Customer,
    Transport,
    UserManagement,
    CrossTenant,
    DataExport,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 18] = [
        Permission::ViewInventory,
        Permission::CreateInventory,
        Permission::EditInventory,
        Permission::DeleteInventory,
        Permission::ViewWorkOrders,
        Permission::CreateWorkOrders,
        Permission::EditWorkOrders,
        Permission::ApproveWorkOrders,
        Permission::DeleteWorkOrders,
        Permission::ViewCustomers,
        Permission::ManageCustomers,
        Permission::ViewTransport,
        Permission::ManageTransport,
        Permission::ViewUsers,
        Permission::ManageUsers,
        Permission::ViewCrossTenant,
        Permission::ManageCrossTenant,
        Permission::ExportData,
    ];

    /// Wire name of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewInventory => "view_inventory",
            Self::CreateInventory => "create_inventory",
            Self::EditInventory => "edit_inventory",
            Self::DeleteInventory => "delete_inventory",
            Self::ViewWorkOrders => "view_work_orders",
            Self::CreateWorkOrders => "create_work_orders",
            Self::EditWorkOrders => "edit_work_orders",
            Self::ApproveWorkOrders => "approve_work_orders",
            Self::DeleteWorkOrders => "delete_work_orders",
            Self::ViewCustomers => "view_customers",
            Self::ManageCustomers => "manage_customers",
            Self::ViewTransport => "view_transport",
            Self::ManageTransport => "manage_transport",
            Self::ViewUsers => "view_users",
            Self::ManageUsers => "manage_users",
            Self::ViewCrossTenant => "view_cross_tenant",
            Self::ManageCrossTenant => "manage_cross_tenant",
            Self::ExportData => "export_data",
        }
    }

    /// The family this permission belongs to.
    pub fn family(&self) -> PermissionFamily {
        match self {
            Self::ViewInventory
            | Self::CreateInventory
            | Self::EditInventory
            | Self::DeleteInventory => PermissionFamily::Inventory,
            Self::ViewWorkOrders
            | Self::CreateWorkOrders
            | Self::EditWorkOrders
            | Self::ApproveWorkOrders
            | Self::DeleteWorkOrders => PermissionFamily::WorkOrder,
            Self::ViewCustomers | Self::ManageCustomers => PermissionFamily::Customer,
            Self::ViewTransport | Self::ManageTransport => PermissionFamily::Transport,
            Self::ViewUsers | Self::ManageUsers => PermissionFamily::UserManagement,
            Self::ViewCrossTenant | Self::ManageCrossTenant => PermissionFamily::CrossTenant,
            Self::ExportData => PermissionFamily::DataExport,
        }
    }

    /// Human-readable description shown in admin tooling.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ViewInventory => "View inventory items and stock levels",
            Self::CreateInventory => "Receive new inventory into a yard",
            Self::EditInventory => "Adjust inventory records",
            Self::DeleteInventory => "Remove inventory records",
            Self::ViewWorkOrders => "View work orders",
            Self::CreateWorkOrders => "Create work orders",
            Self::EditWorkOrders => "Edit open work orders",
            Self::ApproveWorkOrders => "Approve work orders for execution",
            Self::DeleteWorkOrders => "Cancel and delete work orders",
            Self::ViewCustomers => "View customer records",
            Self::ManageCustomers => "Create and edit customer records",
            Self::ViewTransport => "View inbound and outbound transport",
            Self::ManageTransport => "Schedule and edit transport",
            Self::ViewUsers => "View users of the tenant",
            Self::ManageUsers => "Create, edit, and deactivate users",
            Self::ViewCrossTenant => "View data across tenants",
            Self::ManageCrossTenant => "Modify data across tenants",
            Self::ExportData => "Export data to files",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("Unknown permission: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_parse_back() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>(), Ok(permission));
        }
        assert!("launch_rockets".parse::<Permission>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        let json = serde_json::to_string(&Permission::ApproveWorkOrders).unwrap();
        assert_eq!(json, "\"approve_work_orders\"");
    }

    #[test]
    fn test_families() {
        assert_eq!(Permission::ManageTransport.family(), PermissionFamily::Transport);
        assert_eq!(Permission::ViewCrossTenant.family(), PermissionFamily::CrossTenant);
    }
}
