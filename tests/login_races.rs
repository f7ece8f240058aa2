//! Login racing administrative changes to the same user.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use common::{JWT_SECRET, PASSWORD};
use yardstock_auth::{AuthError, AuthenticationService, LoginRequest, NewUser};
use yardstock_core::config::{AuthConfig, SessionConfig};
use yardstock_core::result::AppResult;
use yardstock_core::types::{TenantId, UserId};
use yardstock_entity::access::TenantAccess;
use yardstock_entity::user::{CreateUser, User, UserRole};
use yardstock_store::{MemorySessionStore, MemoryUserStore, UserStore};

/// User store that holds one username lookup after the read until released.
#[derive(Default)]
struct GatedUserStore {
    inner: MemoryUserStore,
    armed: AtomicBool,
    paused: Notify,
    resume: Notify,
}

impl GatedUserStore {
    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for GatedUserStore {
    async fn get_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.inner.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.inner.get_user_by_email(email).await
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let found = self.inner.get_user_by_username(username).await;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.paused.notify_one();
            self.resume.notified().await;
        }
        found
    }

    async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        self.inner.create_user(user).await
    }

    async fn update_user(&self, user: &User) -> AppResult<()> {
        self.inner.update_user(user).await
    }

    async fn record_login(
        &self,
        id: UserId,
        observed_updated_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.inner.record_login(id, observed_updated_at, at).await
    }
}

async fn setup() -> (AuthenticationService, Arc<GatedUserStore>, User) {
    let config = AuthConfig {
        jwt_secret: JWT_SECRET.to_string(),
        password_require_strength: false,
        ..AuthConfig::default()
    };
    let users = Arc::new(GatedUserStore::default());
    let auth = AuthenticationService::new(
        &config,
        &SessionConfig::default(),
        users.clone(),
        Arc::new(MemorySessionStore::new()),
    )
    .unwrap();

    let user = auth
        .create_user(NewUser {
            username: "dana".to_string(),
            email: "dana@example.com".to_string(),
            password: PASSWORD.to_string(),
            role: UserRole::Operator,
            is_enterprise_user: false,
            primary_tenant_id: TenantId::from("houston"),
            customer_id: None,
            contact_type: None,
            tenant_access: vec![TenantAccess::new("houston", UserRole::Operator)],
        })
        .await
        .unwrap();

    (auth, users, user)
}

#[tokio::test]
async fn test_deactivation_during_login_wins() {
    let (auth, users, user) = setup().await;
    users.arm();

    let deactivate = async {
        users.paused.notified().await;
        auth.set_user_active(user.id, false).await.unwrap();
        users.resume.notify_one();
    };
    let (login, ()) = tokio::join!(auth.login(LoginRequest::new("dana", PASSWORD)), deactivate);

    assert!(matches!(login, Err(AuthError::InvalidCredentials)));
    let stored = users.get_user_by_id(user.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert!(stored.last_login_at.is_none());
    assert!(auth.list_sessions(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_password_change_during_login_wins() {
    let (auth, users, user) = setup().await;
    users.arm();

    let new_password = "Pallet#Jack7";
    let change = async {
        users.paused.notified().await;
        auth.change_password(user.id, PASSWORD, new_password)
            .await
            .unwrap();
        users.resume.notify_one();
    };
    let (login, ()) = tokio::join!(auth.login(LoginRequest::new("dana", PASSWORD)), change);

    assert!(matches!(login, Err(AuthError::InvalidCredentials)));
    assert!(auth.list_sessions(user.id).await.unwrap().is_empty());

    // The new hash was not overwritten by the stale login.
    assert!(auth.login(LoginRequest::new("dana", PASSWORD)).await.is_err());
    let login = auth
        .login(LoginRequest::new("dana", new_password))
        .await
        .unwrap();
    assert!(auth.validate_token(&login.token).await.is_ok());
}

#[tokio::test]
async fn test_login_records_last_login_without_touching_updated_at() {
    let (auth, users, user) = setup().await;

    let login = auth.login(LoginRequest::new("dana", PASSWORD)).await.unwrap();
    assert!(login.user.last_login_at.is_some());

    let stored = users.get_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.updated_at, user.updated_at);
    assert_eq!(stored.last_login_at, login.user.last_login_at);
}
