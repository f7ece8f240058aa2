//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, credential, and token configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for bearer token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token (and session) lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token lifetime in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_hours: u64,
    /// Clock-skew leeway applied to the token `exp` claim.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Whether new passwords must pass the zxcvbn entropy check.
    #[serde(default = "default_true")]
    pub password_require_strength: bool,
    /// How yard-level grants apply to enterprise users.
    #[serde(default)]
    pub enterprise_yard_policy: EnterpriseYardPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_hours: default_refresh_ttl(),
            jwt_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            password_require_strength: true,
            enterprise_yard_policy: EnterpriseYardPolicy::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_hours", &self.refresh_token_ttl_hours)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("password_min_length", &self.password_min_length)
            .field("password_require_strength", &self.password_require_strength)
            .field("enterprise_yard_policy", &self.enterprise_yard_policy)
            .finish_non_exhaustive()
    }
}

/// Policy applied when an enterprise user asks for a yard-level permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnterpriseYardPolicy {
    /// Enterprise users hold every yard permission in any tenant they can resolve.
    #[default]
    Blanket,
    /// Enterprise users are checked against the yard grants of their explicit
    /// tenant access entry, exactly like tenant-scoped users.
    Enforce,
}

impl std::fmt::Display for EnterpriseYardPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnterpriseYardPolicy::Blanket => write!(f, "blanket"),
            EnterpriseYardPolicy::Enforce => write!(f, "enforce"),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    168
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    8
}

fn default_true() -> bool {
    true
}
