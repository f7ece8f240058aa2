//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available to users, globally and per tenant.
///
/// Roles are ordered by privilege level:
/// SystemAdmin > EnterpriseAdmin > Admin > Manager > Operator > CustomerContact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// External user scoped to a single customer's data.
    CustomerContact,
    /// Yard floor staff.
    Operator,
    /// Yard or tenant manager.
    Manager,
    /// Tenant administrator.
    Admin,
    /// Administrator acting across tenants.
    EnterpriseAdmin,
    /// Platform operator with unconditional access.
    SystemAdmin,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::CustomerContact => 1,
            Self::Operator => 2,
            Self::Manager => 3,
            Self::Admin => 4,
            Self::EnterpriseAdmin => 5,
            Self::SystemAdmin => 6,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Roles whose grants are evaluated globally instead of per tenant.
    pub fn is_enterprise_tier(&self) -> bool {
        matches!(self, Self::EnterpriseAdmin | Self::SystemAdmin)
    }

    /// Check if this role is the platform operator.
    pub fn is_system_admin(&self) -> bool {
        matches!(self, Self::SystemAdmin)
    }

    /// Check if this role is an external customer contact.
    pub fn is_customer_contact(&self) -> bool {
        matches!(self, Self::CustomerContact)
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerContact => "customer_contact",
            Self::Operator => "operator",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::EnterpriseAdmin => "enterprise_admin",
            Self::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer_contact" => Ok(Self::CustomerContact),
            "operator" => Ok(Self::Operator),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            "enterprise_admin" => Ok(Self::EnterpriseAdmin),
            "system_admin" => Ok(Self::SystemAdmin),
            _ => Err(format!(
                "Invalid user role: '{s}'. Expected one of: customer_contact, operator, \
                 manager, admin, enterprise_admin, system_admin"
            )),
        }
    }
}
