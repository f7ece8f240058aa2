//! JWT token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use yardstock_core::config::AuthConfig;
use yardstock_core::types::{SessionId, TenantId, UserId};

use crate::error::{AuthError, AuthResult};

use super::claims::Claims;

/// Signs access tokens with the server-held HMAC key.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    header: Header,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
        }
    }

    /// Sign a token for `session_id` valid until `expires_at`.
    pub fn encode(
        &self,
        user_id: UserId,
        tenant_id: &TenantId,
        session_id: &SessionId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = Claims {
            user_id,
            tenant_id: tenant_id.clone(),
            session_id: session_id.clone(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("Failed to encode access token: {e}")))
    }
}
