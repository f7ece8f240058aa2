//! Session lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session sits in its lifecycle.
///
/// ```text
/// Active ──time──▶ Expired ──time──▶ RefreshExpired
///   │
///   └──logout / invalidation──▶ Revoked
/// ```
///
/// No state leads back to `Active`; refreshing mints a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Access token usable.
    Active,
    /// Access window over; the refresh token may still be redeemed.
    Expired,
    /// Both windows over.
    RefreshExpired,
    /// Explicitly logged out or invalidated.
    Revoked,
}

impl SessionState {
    /// Whether the session can still back an access token.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the refresh token can still be redeemed.
    pub fn is_refreshable(&self) -> bool {
        matches!(self, Self::Active | Self::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::RefreshExpired => "refresh_expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
