//! Yard-level grants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EntityError;

/// A capability that can be granted on a single yard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YardPermission {
    ViewWorkOrders,
    CreateWorkOrders,
    ApproveOrders,
    ViewInventory,
    ManageTransport,
    ExportData,
}

impl YardPermission {
    /// Every yard permission, in field order.
    pub const ALL: [YardPermission; 6] = [
        YardPermission::ViewWorkOrders,
        YardPermission::CreateWorkOrders,
        YardPermission::ApproveOrders,
        YardPermission::ViewInventory,
        YardPermission::ManageTransport,
        YardPermission::ExportData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewWorkOrders => "view_work_orders",
            Self::CreateWorkOrders => "create_work_orders",
            Self::ApproveOrders => "approve_orders",
            Self::ViewInventory => "view_inventory",
            Self::ManageTransport => "manage_transport",
            Self::ExportData => "export_data",
        }
    }
}

impl fmt::Display for YardPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-yard grant nested inside a [`TenantAccess`](super::TenantAccess).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YardAccess {
    /// Yard key, unique within the parent tenant access.
    pub yard_location: String,
    pub can_view_work_orders: bool,
    pub can_create_work_orders: bool,
    pub can_approve_orders: bool,
    pub can_view_inventory: bool,
    pub can_manage_transport: bool,
    pub can_export_data: bool,
}

impl YardAccess {
    /// Create a grant on `yard_location` holding exactly `permissions`.
    pub fn with_permissions(
        yard_location: impl Into<String>,
        permissions: &[YardPermission],
    ) -> Self {
        let mut access = Self {
            yard_location: yard_location.into(),
            ..Self::default()
        };
        for permission in permissions {
            access.set(*permission, true);
        }
        access
    }

    /// Whether this grant includes `permission`.
    pub fn allows(&self, permission: YardPermission) -> bool {
        match permission {
            YardPermission::ViewWorkOrders => self.can_view_work_orders,
            YardPermission::CreateWorkOrders => self.can_create_work_orders,
            YardPermission::ApproveOrders => self.can_approve_orders,
            YardPermission::ViewInventory => self.can_view_inventory,
            YardPermission::ManageTransport => self.can_manage_transport,
            YardPermission::ExportData => self.can_export_data,
        }
    }

    /// Set or clear a single capability.
    pub fn set(&mut self, permission: YardPermission, granted: bool) {
        let field = match permission {
            YardPermission::ViewWorkOrders => &mut self.can_view_work_orders,
            YardPermission::CreateWorkOrders => &mut self.can_create_work_orders,
            YardPermission::ApproveOrders => &mut self.can_approve_orders,
            YardPermission::ViewInventory => &mut self.can_view_inventory,
            YardPermission::ManageTransport => &mut self.can_manage_transport,
            YardPermission::ExportData => &mut self.can_export_data,
        };
        *field = granted;
    }

    /// The capabilities this grant holds.
    pub fn granted(&self) -> Vec<YardPermission> {
        YardPermission::ALL
            .into_iter()
            .filter(|p| self.allows(*p))
            .collect()
    }

    /// A yard grant must name a yard and hold at least one capability.
    pub fn validate(&self) -> Result<(), EntityError> {
        if self.yard_location.trim().is_empty() {
            return Err(EntityError::EmptyYardLocation);
        }
        if self.granted().is_empty() {
            return Err(EntityError::EmptyYardAccess {
                yard: self.yard_location.clone(),
            });
        }
        Ok(())
    }
}
