//! The authentication façade consumed by the HTTP layer.

pub mod login;
pub mod users;

use std::sync::Arc;

use chrono::Utc;

use yardstock_core::config::{AuthConfig, SessionConfig};
use yardstock_core::error::AppError;
use yardstock_core::types::UserId;
use yardstock_entity::user::User;
use yardstock_store::{SessionStore, UserStore};

use crate::error::{AuthError, AuthResult};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::rbac::{PermissionResolver, PermissionTable};
use crate::session::SessionManager;

pub use login::{LoginRequest, LoginResponse};
pub use users::NewUser;

/// Login, logout, token validation, permission checks, and user/session
/// lifecycle operations.
///
/// Cheap to clone; every collaborator is shared.
#[derive(Clone)]
pub struct AuthenticationService {
    users: Arc<dyn UserStore>,
    sessions: SessionManager,
    hasher: PasswordHasher,
    password_policy: PasswordValidator,
    permissions: PermissionResolver,
}

impl std::fmt::Debug for AuthenticationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationService")
            .field("sessions", &self.sessions)
            .field("password_policy", &self.password_policy)
            .field("yard_policy", &self.permissions.yard_policy())
            .finish_non_exhaustive()
    }
}

impl AuthenticationService {
    /// Wire the service with the default permission table.
    pub fn new(
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> AuthResult<Self> {
        if auth_config.jwt_secret.is_empty() {
            return Err(AuthError::Crypto("JWT secret must not be empty".into()));
        }

        Ok(Self {
            sessions: SessionManager::new(auth_config, session_config, sessions, Arc::clone(&users)),
            users,
            hasher: PasswordHasher::new(),
            password_policy: PasswordValidator::new(auth_config),
            permissions: PermissionResolver::new(
                Arc::new(PermissionTable::default()),
                auth_config.enterprise_yard_policy,
            ),
        })
    }

    /// Replace the role table. Intended for startup wiring only.
    pub fn with_permission_table(mut self, table: PermissionTable) -> Self {
        self.permissions = PermissionResolver::new(Arc::new(table), self.permissions.yard_policy());
        self
    }

    pub fn permissions(&self) -> &PermissionResolver {
        &self.permissions
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    async fn load_user(&self, user_id: UserId) -> AuthResult<User> {
        self.users
            .get_user_by_id(user_id)
            .await
            .map_err(|e| AuthError::store("load user", e))?
            .ok_or_else(|| {
                AuthError::store("load user", AppError::not_found(format!("User {user_id} not found")))
            })
    }

    async fn save_user(&self, user: &mut User) -> AuthResult<()> {
        user.updated_at = Utc::now();
        self.users
            .update_user(user)
            .await
            .map_err(|e| AuthError::store("update user", e))
    }
}
