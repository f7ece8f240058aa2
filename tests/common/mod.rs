//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use yardstock_auth::{AuthenticationService, LoginRequest, LoginResponse, NewUser};
use yardstock_core::config::{AuthConfig, EnterpriseYardPolicy, SessionConfig};
use yardstock_core::types::{CustomerId, TenantId};
use yardstock_entity::access::TenantAccess;
use yardstock_entity::user::{ContactType, User, UserRole};
use yardstock_store::{MemorySessionStore, MemoryUserStore};

pub const PASSWORD: &str = "Forklift#42";
pub const JWT_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    pub auth: AuthenticationService,
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub config: AuthConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(EnterpriseYardPolicy::Blanket)
    }

    pub fn with_policy(policy: EnterpriseYardPolicy) -> Self {
        let config = AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            password_require_strength: false,
            enterprise_yard_policy: policy,
            ..AuthConfig::default()
        };
        let users = Arc::new(MemoryUserStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let auth = AuthenticationService::new(
            &config,
            &SessionConfig::default(),
            users.clone(),
            sessions.clone(),
        )
        .expect("Failed to build authentication service");

        Self {
            auth,
            users,
            sessions,
            config,
        }
    }

    /// Create a tenant-scoped user holding `grants`.
    pub async fn create_user(
        &self,
        username: &str,
        role: UserRole,
        grants: Vec<TenantAccess>,
    ) -> User {
        let primary = grants
            .first()
            .map(|g| g.tenant_id.clone())
            .unwrap_or_else(|| TenantId::from("houston"));
        self.auth
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
                role,
                is_enterprise_user: false,
                primary_tenant_id: primary,
                customer_id: None,
                contact_type: None,
                tenant_access: grants,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Create an enterprise user holding `grants`.
    pub async fn create_enterprise_user(
        &self,
        username: &str,
        role: UserRole,
        grants: Vec<TenantAccess>,
    ) -> User {
        self.auth
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
                role,
                is_enterprise_user: true,
                primary_tenant_id: TenantId::from("houston"),
                customer_id: None,
                contact_type: None,
                tenant_access: grants,
            })
            .await
            .expect("Failed to create enterprise user")
    }

    /// Create a customer contact for customer 501.
    pub async fn create_customer_contact(&self, username: &str, grant: TenantAccess) -> User {
        self.auth
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
                role: UserRole::CustomerContact,
                is_enterprise_user: false,
                primary_tenant_id: grant.tenant_id.clone(),
                customer_id: Some(CustomerId(501)),
                contact_type: Some(ContactType::Approver),
                tenant_access: vec![grant],
            })
            .await
            .expect("Failed to create customer contact")
    }

    pub async fn login(&self, username: &str, tenant: &str) -> LoginResponse {
        self.auth
            .login(LoginRequest::new(username, PASSWORD).for_tenant(tenant))
            .await
            .expect("Login failed")
    }
}
