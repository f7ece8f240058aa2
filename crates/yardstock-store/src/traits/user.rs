//! User persistence contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use yardstock_core::result::AppResult;
use yardstock_core::types::UserId;
use yardstock_entity::user::{CreateUser, User};

/// Reads and writes user records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn get_user_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user and return it with its assigned id.
    ///
    /// Fails with a `Conflict` error when the username or email is taken.
    async fn create_user(&self, user: CreateUser) -> AppResult<User>;

    /// Replace an existing user record. Fails with `NotFound` if absent.
    async fn update_user(&self, user: &User) -> AppResult<()>;

    /// Atomically stamp `last_login_at` on a user that is still active and
    /// unchanged since `observed_updated_at`. Touches no other field and
    /// does not bump `updated_at`.
    ///
    /// Returns the stored user, or `None` when it is missing, inactive, or
    /// was modified after the caller read it.
    async fn record_login(
        &self,
        id: UserId,
        observed_updated_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<User>>;
}
