//! JWT token validation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use yardstock_core::config::AuthConfig;

use crate::error::{AuthError, AuthResult};

use super::claims::Claims;

/// Verifies token signatures and decodes claims.
///
/// Only HS256 is accepted. A token whose header names any other
/// algorithm fails before the signature is checked.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature, algorithm, and expiry checks.
    validation: Validation,
    /// Same as `validation` with the expiry check disabled.
    lenient: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        let mut lenient = validation.clone();
        lenient.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            lenient,
        }
    }

    /// Decode a token, rejecting it once `exp` has passed.
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        self.decode_with(token, &self.validation)
    }

    /// Decode a token whose `exp` may have passed. The signature and
    /// algorithm are still verified.
    pub fn decode_allow_expired(&self, token: &str) -> AuthResult<Claims> {
        self.decode_with(token, &self.lenient)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => {
                    debug!(error = %e, "Rejected bearer token");
                    AuthError::TokenInvalid
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use yardstock_core::types::{SessionId, TenantId, UserId};

    use crate::jwt::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn issue(secret: &str, expires_in: Duration) -> String {
        let now = Utc::now();
        JwtEncoder::new(&config(secret))
            .encode(
                UserId(7),
                &TenantId::from("houston"),
                &SessionId::from("abc"),
                now,
                now + expires_in,
            )
            .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let token = issue("s3cret", Duration::minutes(5));
        let claims = JwtDecoder::new(&config("s3cret")).decode(&token).unwrap();
        assert_eq!(claims.user_id, UserId(7));
        assert_eq!(claims.tenant_id.as_str(), "houston");
        assert_eq!(claims.session_id.as_str(), "abc");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue("s3cret", Duration::minutes(5));
        let err = JwtDecoder::new(&config("other")).decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let decoder = JwtDecoder::new(&config("s3cret"));
        assert!(matches!(decoder.decode("not.a.jwt"), Err(AuthError::TokenInvalid)));
        assert!(matches!(decoder.decode(""), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        let now = Utc::now();
        let claims = Claims {
            user_id: UserId(7),
            tenant_id: TenantId::from("houston"),
            session_id: SessionId::from("abc"),
            exp: (now + Duration::minutes(5)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config("s3cret")).decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_expired_token() {
        let token = issue("s3cret", Duration::minutes(-10));
        let decoder = JwtDecoder::new(&config("s3cret"));
        assert!(matches!(decoder.decode(&token), Err(AuthError::SessionExpired)));
        assert!(decoder.decode_allow_expired(&token).is_ok());
    }
}
