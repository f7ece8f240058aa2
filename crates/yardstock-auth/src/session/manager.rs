//! Session lifecycle manager: issuance, validation, refresh rotation, revocation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use yardstock_core::config::{AuthConfig, SessionConfig};
use yardstock_core::types::{SessionId, TenantId, UserId};
use yardstock_entity::access::TenantAccess;
use yardstock_entity::session::Session;
use yardstock_entity::user::User;
use yardstock_store::{SessionStore, UserStore};

use crate::error::{AuthError, AuthResult};
use crate::jwt::{JwtDecoder, JwtEncoder};

/// Client metadata recorded on a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A freshly created session and the raw credentials backing it.
///
/// The raw tokens exist only here; the store keeps their fingerprints.
#[derive(Clone)]
pub struct IssuedSession {
    pub session: Session,
    /// Signed bearer token.
    pub access_token: String,
    /// Opaque single-use refresh token.
    pub refresh_token: String,
}

impl std::fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedSession")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// The identity behind a validated bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub user: User,
    pub session_id: SessionId,
    pub tenant_id: TenantId,
    /// Snapshot stored on the session at issuance.
    pub tenant_access: TenantAccess,
}

/// Manages the complete session lifecycle.
///
/// The session record is the authority; a token with a valid signature
/// is rejected when its session is revoked or past `expires_at`.
#[derive(Clone)]
pub struct SessionManager {
    /// Session persistence.
    sessions: Arc<dyn SessionStore>,
    /// User lookups during validation.
    users: Arc<dyn UserStore>,
    /// JWT encoder for token generation.
    encoder: JwtEncoder,
    /// JWT decoder for token validation.
    decoder: JwtDecoder,
    access_ttl: Duration,
    refresh_ttl: Duration,
    retention: Duration,
    /// Random bytes behind each session id and refresh token.
    token_bytes: usize,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("retention", &self.retention)
            .field("token_bytes", &self.token_bytes)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            sessions,
            users,
            encoder: JwtEncoder::new(auth_config),
            decoder: JwtDecoder::new(auth_config),
            access_ttl: Duration::minutes(auth_config.access_token_ttl_minutes as i64),
            refresh_ttl: Duration::hours(auth_config.refresh_token_ttl_hours as i64),
            retention: Duration::days(session_config.retention_days as i64),
            token_bytes: session_config.token_bytes,
        }
    }

    /// Create and persist a session for `user` in `tenant_id`, issuing a
    /// signed access token and a random refresh token.
    pub async fn create_session(
        &self,
        user: &User,
        tenant_id: &TenantId,
        tenant_access: TenantAccess,
        client: &ClientInfo,
    ) -> AuthResult<IssuedSession> {
        let now = Utc::now();
        let session_id = SessionId::new(self.random_token());
        let refresh_token = self.random_token();
        let expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_token =
            self.encoder
                .encode(user.id, tenant_id, &session_id, now, expires_at)?;

        let session = Session {
            id: session_id,
            user_id: user.id,
            tenant_id: tenant_id.clone(),
            token_hash: fingerprint(&access_token),
            refresh_token_hash: fingerprint(&refresh_token),
            tenant_access,
            is_active: true,
            expires_at,
            refresh_expires_at,
            created_at: now,
            last_used_at: now,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        };

        self.sessions
            .create_session(&session)
            .await
            .map_err(|e| AuthError::store("create session", e))?;

        info!(
            user_id = %user.id,
            tenant_id = %tenant_id,
            session_id = %session.id,
            "Session created"
        );

        Ok(IssuedSession {
            session,
            access_token,
            refresh_token,
        })
    }

    /// Validate a bearer token against its session and user.
    ///
    /// Returns the session's stored tenant snapshot, not a fresh resolve.
    pub async fn validate_token(&self, token: &str) -> AuthResult<AuthContext> {
        let claims = self.decoder.decode(token)?;

        let session = self
            .sessions
            .get_session_by_id(&claims.session_id)
            .await
            .map_err(|e| AuthError::store("load session", e))?
            .ok_or(AuthError::SessionInvalid)?;

        if session.token_hash != fingerprint(token)
            || session.user_id != claims.user_id
            || session.tenant_id != claims.tenant_id
        {
            debug!(session_id = %session.id, "Token does not match its session");
            return Err(AuthError::TokenInvalid);
        }

        let now = Utc::now();
        if !session.is_active {
            return Err(AuthError::SessionInvalid);
        }
        if now > session.expires_at {
            return Err(AuthError::SessionExpired);
        }

        let user = self
            .users
            .get_user_by_id(session.user_id)
            .await
            .map_err(|e| AuthError::store("load user", e))?
            .ok_or(AuthError::SessionInvalid)?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        let touched = self
            .sessions
            .touch_session(&session.id, now)
            .await
            .map_err(|e| AuthError::store("touch session", e))?;
        if !touched {
            return Err(AuthError::SessionInvalid);
        }

        Ok(AuthContext {
            user,
            session_id: session.id,
            tenant_id: session.tenant_id,
            tenant_access: session.tenant_access,
        })
    }

    /// Redeem a refresh token, retiring its session.
    ///
    /// Only one concurrent caller can redeem a given token; the others see
    /// `SessionInvalid`. The caller mints the replacement session.
    pub async fn redeem_refresh_token(&self, refresh_token: &str) -> AuthResult<Session> {
        let session = self
            .sessions
            .get_session_by_refresh_token(&fingerprint(refresh_token))
            .await
            .map_err(|e| AuthError::store("load session by refresh token", e))?
            .ok_or(AuthError::SessionInvalid)?;

        if !session.is_active {
            return Err(AuthError::SessionInvalid);
        }
        if !session.is_refreshable_at(Utc::now()) {
            return Err(AuthError::SessionExpired);
        }

        let won = self
            .sessions
            .invalidate_session(&session.id)
            .await
            .map_err(|e| AuthError::store("invalidate session", e))?;
        if !won {
            return Err(AuthError::SessionInvalid);
        }

        debug!(session_id = %session.id, "Refresh token redeemed");
        Ok(session)
    }

    /// Revoke the session behind `token`.
    ///
    /// An expired token is still accepted so clients can always log out.
    /// Revoking an already revoked or purged session succeeds.
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        let claims = self.decoder.decode_allow_expired(token)?;

        let Some(session) = self
            .sessions
            .get_session_by_id(&claims.session_id)
            .await
            .map_err(|e| AuthError::store("load session", e))?
        else {
            return Ok(());
        };

        if session.token_hash != fingerprint(token) {
            return Err(AuthError::TokenInvalid);
        }

        let changed = self
            .sessions
            .invalidate_session(&session.id)
            .await
            .map_err(|e| AuthError::store("invalidate session", e))?;

        if changed {
            info!(
                user_id = %session.user_id,
                session_id = %session.id,
                "Session revoked"
            );
        }
        Ok(())
    }

    /// Revoke a session by id. Returns whether it was active.
    pub async fn terminate(&self, session_id: &SessionId) -> AuthResult<bool> {
        self.sessions
            .invalidate_session(session_id)
            .await
            .map_err(|e| AuthError::store("invalidate session", e))
    }

    /// Revoke every active session of a user.
    pub async fn invalidate_user_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        let count = self
            .sessions
            .invalidate_all_sessions_for_user(user_id)
            .await
            .map_err(|e| AuthError::store("invalidate user sessions", e))?;
        info!(user_id = %user_id, count, "User sessions invalidated");
        Ok(count)
    }

    pub async fn get_session(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        self.sessions
            .get_session_by_id(session_id)
            .await
            .map_err(|e| AuthError::store("load session", e))
    }

    /// Active sessions of a user, newest first.
    pub async fn list_sessions(&self, user_id: UserId) -> AuthResult<Vec<Session>> {
        self.sessions
            .list_active_sessions_for_user(user_id)
            .await
            .map_err(|e| AuthError::store("list sessions", e))
    }

    /// Delete sessions whose refresh window closed more than the retention
    /// period before `now`.
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        self.sessions
            .delete_expired_sessions(now - self.retention)
            .await
            .map_err(|e| AuthError::store("delete expired sessions", e))
    }

    fn random_token(&self) -> String {
        let mut bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// SHA-256 of a bearer value, hex encoded.
pub(crate) fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
