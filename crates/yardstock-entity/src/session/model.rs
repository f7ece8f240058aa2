//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yardstock_core::types::{SessionId, TenantId, UserId};

use crate::access::TenantAccess;

use super::state::SessionState;

/// A server-side session binding a user to a tenant context.
///
/// The session, not the bearer token, is the authority for revocation and
/// expiry. Raw tokens are never stored; only their SHA-256 fingerprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque random identifier.
    pub id: SessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Tenant the session acts in.
    pub tenant_id: TenantId,
    /// Fingerprint of the signed access token.
    pub token_hash: String,
    /// Fingerprint of the opaque refresh token.
    pub refresh_token_hash: String,
    /// Grant resolved at issuance. Not re-derived on later requests.
    pub tenant_access: TenantAccess,
    /// Cleared by logout or bulk invalidation; never set again.
    pub is_active: bool,
    /// End of the access window.
    pub expires_at: DateTime<Utc>,
    /// End of the refresh window.
    pub refresh_expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last successful token validation.
    pub last_used_at: DateTime<Utc>,
    /// Client IP address at login.
    pub ip_address: Option<String>,
    /// Client User-Agent at login.
    pub user_agent: Option<String>,
}

impl Session {
    /// Lifecycle state at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if !self.is_active {
            SessionState::Revoked
        } else if now > self.refresh_expires_at {
            SessionState::RefreshExpired
        } else if now > self.expires_at {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    /// Lifecycle state right now.
    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }

    /// Whether the refresh token can be redeemed at `now`.
    pub fn is_refreshable_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now).is_refreshable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::user::UserRole;

    fn session(now: DateTime<Utc>) -> Session {
        Session {
            id: SessionId::from("s1"),
            user_id: UserId(1),
            tenant_id: TenantId::from("houston"),
            token_hash: String::new(),
            refresh_token_hash: String::new(),
            tenant_access: TenantAccess::new("houston", UserRole::Operator),
            is_active: true,
            expires_at: now + Duration::minutes(60),
            refresh_expires_at: now + Duration::hours(168),
            created_at: now,
            last_used_at: now,
            ip_address: None,
            user_agent: None,
        }
    }

    #[test]
    fn test_state_transitions_over_time() {
        let now = Utc::now();
        let s = session(now);
        assert_eq!(s.state_at(now), SessionState::Active);
        assert_eq!(s.state_at(now + Duration::minutes(61)), SessionState::Expired);
        assert!(s.is_refreshable_at(now + Duration::minutes(61)));
        assert_eq!(
            s.state_at(now + Duration::hours(169)),
            SessionState::RefreshExpired
        );
    }

    #[test]
    fn test_revoked_is_terminal() {
        let now = Utc::now();
        let mut s = session(now);
        s.is_active = false;
        assert_eq!(s.state_at(now), SessionState::Revoked);
        assert!(!s.is_refreshable_at(now));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let s = session(now);
        assert_eq!(s.state_at(s.expires_at), SessionState::Active);
    }
}
