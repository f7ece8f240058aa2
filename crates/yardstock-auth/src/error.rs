//! Typed authentication and authorization failures.
//!
//! Every variant is a per-request outcome. The HTTP layer converts them
//! into client responses through `From<AuthError> for AppError`.

use thiserror::Error;

use yardstock_core::error::{AppError, ErrorKind};
use yardstock_core::types::TenantId;
use yardstock_entity::EntityError;

/// Result alias used throughout the engine.
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, inactive user at login, or wrong password. Never
    /// distinguishes between them.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user account is inactive")]
    UserInactive,

    /// Bad signature, malformed token, or unexpected algorithm.
    #[error("invalid token")]
    TokenInvalid,

    #[error("session has expired")]
    SessionExpired,

    #[error("session is no longer valid")]
    SessionInvalid,

    #[error("no access to tenant '{tenant_id}'")]
    TenantAccessDenied { tenant_id: TenantId },

    #[error("permission '{permission}' denied")]
    PermissionDenied { permission: String },

    #[error("access to yard '{yard}' denied")]
    YardAccessDenied { yard: String },

    #[error("enterprise access required")]
    EnterpriseAccessRequired,

    #[error("user is not a customer contact")]
    NotCustomerContact,

    #[error("yard access for '{yard}' must grant at least one capability")]
    InvalidYardAccessConfiguration { yard: String },

    #[error("validation failed: {0}")]
    Validation(String),

    /// Hashing or signing failed. Treated as a configuration fault.
    #[error("cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: AppError,
    },
}

impl AuthError {
    /// Wrap a store failure with the operation that hit it.
    pub fn store(context: &'static str, source: AppError) -> Self {
        Self::Store { context, source }
    }

    /// Whether the failure is caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Crypto(_) => false,
            Self::Store { source, .. } => matches!(
                source.kind,
                ErrorKind::NotFound | ErrorKind::Conflict | ErrorKind::Validation
            ),
            _ => true,
        }
    }
}

impl From<EntityError> for AuthError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::EmptyYardAccess { yard } => {
                Self::InvalidYardAccessConfiguration { yard }
            }
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = match &err {
            AuthError::InvalidCredentials | AuthError::UserInactive | AuthError::TokenInvalid => {
                ErrorKind::Authentication
            }
            AuthError::SessionExpired | AuthError::SessionInvalid => ErrorKind::Session,
            AuthError::TenantAccessDenied { .. }
            | AuthError::PermissionDenied { .. }
            | AuthError::YardAccessDenied { .. }
            | AuthError::EnterpriseAccessRequired
            | AuthError::NotCustomerContact => ErrorKind::Authorization,
            AuthError::InvalidYardAccessConfiguration { .. } | AuthError::Validation(_) => {
                ErrorKind::Validation
            }
            AuthError::Crypto(_) => ErrorKind::Internal,
            AuthError::Store { source, .. } => source.kind,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yard_maps_to_configuration_error() {
        let err: AuthError = EntityError::EmptyYardAccess {
            yard: "houston_south".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            AuthError::InvalidYardAccessConfiguration { ref yard } if yard == "houston_south"
        ));

        let err: AuthError = EntityError::CustomerIdMismatch.into();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn test_app_error_kinds() {
        let app: AppError = AuthError::InvalidCredentials.into();
        assert_eq!(app.kind, ErrorKind::Authentication);

        let app: AppError = AuthError::SessionInvalid.into();
        assert_eq!(app.kind, ErrorKind::Session);

        let app: AppError = AuthError::TenantAccessDenied {
            tenant_id: TenantId::from("dallas"),
        }
        .into();
        assert_eq!(app.kind, ErrorKind::Authorization);

        let app: AppError = AuthError::store("load user", AppError::database("down")).into();
        assert_eq!(app.kind, ErrorKind::Database);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AuthError::TokenInvalid.is_client_error());
        assert!(!AuthError::Crypto("rng".into()).is_client_error());
        assert!(!AuthError::store("load user", AppError::database("down")).is_client_error());
        assert!(AuthError::store("create user", AppError::conflict("taken")).is_client_error());
    }
}
