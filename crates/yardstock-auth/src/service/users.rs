//! User and session lifecycle operations.
//!
//! Every operation that changes a user's grants revokes that user's
//! sessions, so no session snapshot outlives the change.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use yardstock_core::types::{CustomerId, SessionId, TenantId, UserId};
use yardstock_entity::access::{TenantAccess, YardAccess};
use yardstock_entity::session::Session;
use yardstock_entity::user::{ContactType, CreateUser, User, UserRole};

use crate::error::{AuthError, AuthResult};

use super::AuthenticationService;

/// Input for creating a user.
#[derive(Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    /// Plaintext; hashed before it reaches the store.
    pub password: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_enterprise_user: bool,
    pub primary_tenant_id: TenantId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub contact_type: Option<ContactType>,
    #[serde(default)]
    pub tenant_access: Vec<TenantAccess>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("is_enterprise_user", &self.is_enterprise_user)
            .field("primary_tenant_id", &self.primary_tenant_id)
            .field("customer_id", &self.customer_id)
            .field("tenant_access", &self.tenant_access)
            .finish_non_exhaustive()
    }
}

impl AuthenticationService {
    /// Validate, hash, and persist a new user.
    pub async fn create_user(&self, new_user: NewUser) -> AuthResult<User> {
        new_user.validate()?;

        let mut record = CreateUser {
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
            password_hash: String::new(),
            role: new_user.role,
            is_enterprise_user: new_user.is_enterprise_user,
            primary_tenant_id: new_user.primary_tenant_id,
            customer_id: new_user.customer_id,
            contact_type: new_user.contact_type,
            is_active: true,
            tenant_access: new_user.tenant_access,
        };
        record.validate()?;

        self.password_policy.validate(&new_user.password)?;
        record.password_hash = self.hasher.hash_blocking(new_user.password).await?;

        let user = self
            .users
            .create_user(record)
            .await
            .map_err(|e| AuthError::store("create user", e))?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Change a password after verifying the current one. Revokes all sessions.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let mut user = self.load_user(user_id).await?;

        let valid = self
            .hasher
            .verify_blocking(current_password.to_string(), user.password_hash.clone())
            .await;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.password_policy
            .validate_not_same(current_password, new_password)?;
        self.password_policy.validate(new_password)?;

        user.password_hash = self.hasher.hash_blocking(new_password.to_string()).await?;
        self.save_user(&mut user).await?;
        self.sessions.invalidate_user_sessions(user_id).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Activate or deactivate a user. Deactivation revokes all sessions.
    pub async fn set_user_active(&self, user_id: UserId, active: bool) -> AuthResult<User> {
        let mut user = self.load_user(user_id).await?;
        user.is_active = active;
        self.save_user(&mut user).await?;

        if !active {
            self.sessions.invalidate_user_sessions(user_id).await?;
        }

        info!(user_id = %user_id, active, "User activation changed");
        Ok(user)
    }

    /// Change the top-level role. Revokes all sessions.
    pub async fn change_role(&self, user_id: UserId, role: UserRole) -> AuthResult<User> {
        let mut user = self.load_user(user_id).await?;
        user.role = role;
        user.validate()?;
        self.save_user(&mut user).await?;
        self.sessions.invalidate_user_sessions(user_id).await?;

        info!(user_id = %user_id, role = %role, "User role changed");
        Ok(user)
    }

    /// Insert or replace the grant for `access.tenant_id`. Revokes all sessions.
    pub async fn upsert_tenant_access(
        &self,
        user_id: UserId,
        access: TenantAccess,
    ) -> AuthResult<User> {
        access.validate()?;

        let mut user = self.load_user(user_id).await?;
        let tenant_id = access.tenant_id.clone();
        match user.tenant_access_for_mut(&tenant_id) {
            Some(existing) => *existing = access,
            None => user.tenant_access.push(access),
        }
        user.validate()?;

        self.save_user(&mut user).await?;
        self.sessions.invalidate_user_sessions(user_id).await?;

        info!(user_id = %user_id, tenant_id = %tenant_id, "Tenant access updated");
        Ok(user)
    }

    /// Remove the grant for `tenant_id`. Returns whether one existed.
    pub async fn revoke_tenant_access(
        &self,
        user_id: UserId,
        tenant_id: &TenantId,
    ) -> AuthResult<bool> {
        let mut user = self.load_user(user_id).await?;
        let before = user.tenant_access.len();
        user.tenant_access.retain(|a| &a.tenant_id != tenant_id);
        if user.tenant_access.len() == before {
            return Ok(false);
        }

        self.save_user(&mut user).await?;
        self.sessions.invalidate_user_sessions(user_id).await?;

        info!(user_id = %user_id, tenant_id = %tenant_id, "Tenant access revoked");
        Ok(true)
    }

    /// Insert or replace one yard grant. An all-false grant is rejected
    /// before anything is persisted.
    pub async fn upsert_yard_access(
        &self,
        user_id: UserId,
        tenant_id: &TenantId,
        yard: YardAccess,
    ) -> AuthResult<User> {
        yard.validate()?;

        let mut user = self.load_user(user_id).await?;
        let yard_location = yard.yard_location.clone();
        user.tenant_access_for_mut(tenant_id)
            .ok_or_else(|| AuthError::TenantAccessDenied {
                tenant_id: tenant_id.clone(),
            })?
            .upsert_yard(yard);
        user.validate()?;

        self.save_user(&mut user).await?;
        self.sessions.invalidate_user_sessions(user_id).await?;

        info!(
            user_id = %user_id,
            tenant_id = %tenant_id,
            yard = %yard_location,
            "Yard access updated"
        );
        Ok(user)
    }

    /// Active sessions of a user, newest first.
    pub async fn list_sessions(&self, user_id: UserId) -> AuthResult<Vec<Session>> {
        self.sessions.list_sessions(user_id).await
    }

    /// Administratively revoke one session. Returns whether it was active.
    pub async fn terminate_session(&self, session_id: &SessionId) -> AuthResult<bool> {
        let terminated = self.sessions.terminate(session_id).await?;
        if terminated {
            info!(session_id = %session_id, "Session terminated");
        }
        Ok(terminated)
    }

    pub async fn invalidate_user_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        self.sessions.invalidate_user_sessions(user_id).await
    }

    /// Purge sessions past the retention window.
    pub async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        self.sessions.cleanup_expired(Utc::now()).await
    }
}
