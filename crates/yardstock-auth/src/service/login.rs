//! Login, logout, refresh, validation, and permission checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use yardstock_core::types::{SessionId, TenantId, UserId};
use yardstock_entity::access::{TenantAccess, YardPermission};
use yardstock_entity::permission::Permission;
use yardstock_entity::user::User;

use crate::error::{AuthError, AuthResult};
use crate::rbac::CustomerScope;
use crate::session::{AuthContext, ClientInfo, IssuedSession};

use super::AuthenticationService;

/// Credentials presented at login.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username, or email when it contains `@`.
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Tenant to act in; the primary tenant when absent.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub client: ClientInfo,
}

impl LoginRequest {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            tenant_id: None,
            client: ClientInfo::default(),
        }
    }

    pub fn for_tenant(mut self, tenant_id: impl Into<TenantId>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("tenant_id", &self.tenant_id)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Returned by login and refresh.
#[derive(Clone, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    pub refresh_token: String,
    pub user: User,
    /// The grant the session was issued under.
    pub tenant_context: TenantAccess,
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl LoginResponse {
    fn new(issued: IssuedSession, user: User) -> Self {
        Self {
            token: issued.access_token,
            refresh_token: issued.refresh_token,
            user,
            tenant_context: issued.session.tenant_access,
            session_id: issued.session.id,
            expires_at: issued.session.expires_at,
            refresh_expires_at: issued.session.refresh_expires_at,
        }
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user_id", &self.user.id)
            .field("tenant_context", &self.tenant_context)
            .field("session_id", &self.session_id)
            .field("expires_at", &self.expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

impl AuthenticationService {
    /// Authenticate and open a session.
    ///
    /// 1. Find the user by username or email
    /// 2. Verify the password (against a dummy hash when no active user matched)
    /// 3. Resolve the tenant context
    /// 4. Create the session and issue tokens
    /// 5. Record `last_login_at`, failing if the user changed meanwhile
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        request.validate()?;

        let lookup = if request.identifier.contains('@') {
            self.users.get_user_by_email(&request.identifier).await
        } else {
            self.users.get_user_by_username(&request.identifier).await
        };
        let found = lookup.map_err(|e| AuthError::store("load user", e))?;

        let Some(user) = found.filter(|u| u.is_active) else {
            self.hasher.verify_dummy(request.password).await;
            warn!("Login rejected: unknown or inactive user");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify_blocking(request.password, user.password_hash.clone())
            .await;
        if !valid {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let resolved = self
            .permissions
            .tenants()
            .resolve(&user, request.tenant_id.as_ref())
            .inspect_err(|_| warn!(user_id = %user.id, "Login rejected: tenant not granted"))?;

        let issued = self
            .sessions
            .create_session(&user, &resolved.tenant_id, resolved.access, &request.client)
            .await?;

        // The user record may have changed since it was read above. Stamp
        // the login only if it did not; otherwise retire the new session.
        let recorded = self
            .users
            .record_login(user.id, user.updated_at, issued.session.created_at)
            .await;
        let user = match recorded {
            Ok(Some(current)) => current,
            other => {
                self.sessions.terminate(&issued.session.id).await?;
                return match other {
                    Err(e) => Err(AuthError::store("record login", e)),
                    _ => {
                        warn!(user_id = %user.id, "Login rejected: user changed during login");
                        Err(AuthError::InvalidCredentials)
                    }
                };
            }
        };

        info!(
            user_id = %user.id,
            tenant_id = %resolved.tenant_id,
            source = ?resolved.source,
            "Login successful"
        );

        Ok(LoginResponse::new(issued, user))
    }

    /// Revoke the session behind `token`.
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        self.sessions.revoke(token).await
    }

    /// Rotate a refresh token into a brand-new session.
    ///
    /// The tenant grant is re-resolved from the live user record, so a
    /// refresh never carries a stale snapshot forward.
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<LoginResponse> {
        let old = self.sessions.redeem_refresh_token(refresh_token).await?;

        let user = self
            .users
            .get_user_by_id(old.user_id)
            .await
            .map_err(|e| AuthError::store("load user", e))?
            .ok_or(AuthError::SessionInvalid)?;
        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        let resolved = self.permissions.tenants().resolve(&user, Some(&old.tenant_id))?;
        let client = ClientInfo {
            ip_address: old.ip_address.clone(),
            user_agent: old.user_agent.clone(),
        };
        let issued = self
            .sessions
            .create_session(&user, &resolved.tenant_id, resolved.access, &client)
            .await?;

        info!(
            user_id = %user.id,
            old_session = %old.id,
            new_session = %issued.session.id,
            "Token refreshed"
        );

        Ok(LoginResponse::new(issued, user))
    }

    /// Validate a bearer token. Called by request middleware.
    pub async fn validate_token(&self, token: &str) -> AuthResult<AuthContext> {
        self.sessions.validate_token(token).await
    }

    /// Live permission check for `user_id` in `tenant_id`.
    pub async fn check_permission(
        &self,
        user_id: UserId,
        tenant_id: &TenantId,
        permission: Permission,
    ) -> AuthResult<()> {
        let user = self
            .active_user_or(user_id, || AuthError::PermissionDenied {
                permission: permission.to_string(),
            })
            .await?;
        self.permissions.require_permission(&user, tenant_id, permission)
    }

    /// Live yard-level check for `user_id`.
    pub async fn check_yard_access(
        &self,
        user_id: UserId,
        tenant_id: &TenantId,
        yard: &str,
        permission: YardPermission,
    ) -> AuthResult<()> {
        let user = self
            .active_user_or(user_id, || AuthError::YardAccessDenied {
                yard: yard.to_string(),
            })
            .await?;
        self.permissions
            .require_yard_permission(&user, tenant_id, yard, permission)
    }

    pub async fn check_enterprise_access(&self, user_id: UserId) -> AuthResult<()> {
        let user = self
            .active_user_or(user_id, || AuthError::EnterpriseAccessRequired)
            .await?;
        self.permissions.require_enterprise(&user)
    }

    pub async fn customer_scope(&self, user_id: UserId) -> AuthResult<CustomerScope> {
        let user = self
            .active_user_or(user_id, || AuthError::NotCustomerContact)
            .await?;
        self.permissions.customer_scope(&user)
    }

    /// Load a user for an authorization check. A missing or inactive user
    /// gets the check's own denial.
    async fn active_user_or(
        &self,
        user_id: UserId,
        denied: impl FnOnce() -> AuthError,
    ) -> AuthResult<User> {
        match self
            .users
            .get_user_by_id(user_id)
            .await
            .map_err(|e| AuthError::store("load user", e))?
        {
            Some(user) if user.is_active => Ok(user),
            _ => Err(denied()),
        }
    }
}
