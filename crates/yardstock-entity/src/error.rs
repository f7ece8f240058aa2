//! Invariant violations on identity records.

use thiserror::Error;

use yardstock_core::types::TenantId;

/// A user, tenant access, or yard access record breaks a model invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("yard access for '{yard}' grants no capability")]
    EmptyYardAccess { yard: String },

    #[error("yard location must not be empty")]
    EmptyYardLocation,

    #[error("yard '{yard}' appears more than once in tenant '{tenant_id}'")]
    DuplicateYard { tenant_id: TenantId, yard: String },

    #[error("tenant '{tenant_id}' appears more than once in the access list")]
    DuplicateTenant { tenant_id: TenantId },

    #[error("tenant id must not be empty")]
    EmptyTenant,

    #[error("customer id must be set exactly when the role is customer_contact")]
    CustomerIdMismatch,

    #[error("contact type is only meaningful for customer contacts")]
    UnexpectedContactType,

    #[error("enterprise users cannot be customer contacts")]
    EnterpriseCustomerContact,
}
