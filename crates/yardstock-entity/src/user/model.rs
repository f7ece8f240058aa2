//! User entity model.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yardstock_core::types::{CustomerId, TenantId, UserId};

use crate::access::TenantAccess;
use crate::error::EntityError;

use super::contact::ContactType;
use super::role::UserRole;

/// An identity that can log in to Yardstock.
///
/// All user kinds (customer contacts, tenant staff, enterprise users) share
/// this single type; the role and the optional customer fields decide which
/// rules apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash (PHC string).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Top-level role.
    pub role: UserRole,
    /// Grants are evaluated globally rather than per tenant.
    pub is_enterprise_user: bool,
    /// Tenant used when a request does not name one.
    pub primary_tenant_id: TenantId,
    /// Customer this user represents; set exactly for customer contacts.
    pub customer_id: Option<CustomerId>,
    /// What the customer contact may do for their customer.
    pub contact_type: Option<ContactType>,
    /// Inactive users cannot log in and their tokens stop validating.
    pub is_active: bool,
    /// Per-tenant grants; tenant ids are unique within the list.
    pub tenant_access: Vec<TenantAccess>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user bypasses the per-tenant allow-list.
    pub fn has_enterprise_access(&self) -> bool {
        self.is_enterprise_user || self.role.is_enterprise_tier()
    }

    /// Check if the user is the platform operator.
    pub fn is_system_admin(&self) -> bool {
        self.role.is_system_admin()
    }

    /// Find the grant for `tenant_id` by exact match.
    pub fn tenant_access_for(&self, tenant_id: &TenantId) -> Option<&TenantAccess> {
        self.tenant_access.iter().find(|a| &a.tenant_id == tenant_id)
    }

    /// Mutable variant of [`User::tenant_access_for`].
    pub fn tenant_access_for_mut(&mut self, tenant_id: &TenantId) -> Option<&mut TenantAccess> {
        self.tenant_access
            .iter_mut()
            .find(|a| &a.tenant_id == tenant_id)
    }

    /// Check every model invariant on the record.
    pub fn validate(&self) -> Result<(), EntityError> {
        validate_identity(
            self.role,
            self.is_enterprise_user,
            self.customer_id,
            self.contact_type,
            &self.tenant_access,
        )
    }
}

/// Data required to create a new user. The store assigns the id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    /// Pre-hashed password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_enterprise_user: bool,
    pub primary_tenant_id: TenantId,
    pub customer_id: Option<CustomerId>,
    pub contact_type: Option<ContactType>,
    pub is_active: bool,
    pub tenant_access: Vec<TenantAccess>,
}

impl CreateUser {
    /// Check the same invariants [`User::validate`] enforces.
    pub fn validate(&self) -> Result<(), EntityError> {
        validate_identity(
            self.role,
            self.is_enterprise_user,
            self.customer_id,
            self.contact_type,
            &self.tenant_access,
        )
    }

    /// Materialize the record with a store-assigned id.
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            is_enterprise_user: self.is_enterprise_user,
            primary_tenant_id: self.primary_tenant_id,
            customer_id: self.customer_id,
            contact_type: self.contact_type,
            is_active: self.is_active,
            tenant_access: self.tenant_access,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }
}

fn validate_identity(
    role: UserRole,
    is_enterprise_user: bool,
    customer_id: Option<CustomerId>,
    contact_type: Option<ContactType>,
    tenant_access: &[TenantAccess],
) -> Result<(), EntityError> {
    if customer_id.is_some() != role.is_customer_contact() {
        return Err(EntityError::CustomerIdMismatch);
    }
    if is_enterprise_user && role.is_customer_contact() {
        return Err(EntityError::EnterpriseCustomerContact);
    }
    if contact_type.is_some() && !role.is_customer_contact() {
        return Err(EntityError::UnexpectedContactType);
    }

    let mut tenants = HashSet::new();
    for access in tenant_access {
        access.validate()?;
        if !tenants.insert(&access.tenant_id) {
            return Err(EntityError::DuplicateTenant {
                tenant_id: access.tenant_id.clone(),
            });
        }
    }
    Ok(())
}
