//! Session persistence contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use yardstock_core::result::AppResult;
use yardstock_core::types::{SessionId, UserId};
use yardstock_entity::session::Session;

/// Reads and writes session records.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a freshly created session.
    async fn create_session(&self, session: &Session) -> AppResult<()>;

    /// Find a session by id.
    async fn get_session_by_id(&self, id: &SessionId) -> AppResult<Option<Session>>;

    /// Find a session by the fingerprint of its refresh token.
    async fn get_session_by_refresh_token(&self, refresh_token_hash: &str)
    -> AppResult<Option<Session>>;

    /// Replace an existing session record.
    async fn update_session(&self, session: &Session) -> AppResult<()>;

    /// Atomically set `last_used_at`. Returns `false` if the session is gone.
    async fn touch_session(&self, id: &SessionId, at: DateTime<Utc>) -> AppResult<bool>;

    /// Atomically mark a session inactive.
    ///
    /// Returns `true` only for the call that moved it from active to
    /// inactive, so concurrent callers can tell who won.
    async fn invalidate_session(&self, id: &SessionId) -> AppResult<bool>;

    /// Mark every active session of a user inactive; returns how many changed.
    async fn invalidate_all_sessions_for_user(&self, user_id: UserId) -> AppResult<u64>;

    /// Delete sessions whose refresh window ended before `before`.
    async fn delete_expired_sessions(&self, before: DateTime<Utc>) -> AppResult<u64>;

    /// Sessions of a user that are still marked active, newest first.
    async fn list_active_sessions_for_user(&self, user_id: UserId) -> AppResult<Vec<Session>>;
}
