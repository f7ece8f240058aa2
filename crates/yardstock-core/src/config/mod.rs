//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file pair (`config/default` + environment overlay) and
//! `YARDSTOCK__`-prefixed environment variables. Every field has a default,
//! so an empty source yields a usable configuration.

pub mod auth;
pub mod bootstrap;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::auth::{AuthConfig, EnterpriseYardPolicy};
pub use self::bootstrap::BootstrapConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Longest accepted access token lifetime (one week).
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: u64 = 7 * 24 * 60;
/// Longest accepted refresh token lifetime (one year).
pub const MAX_REFRESH_TOKEN_TTL_HOURS: u64 = 365 * 24;
/// Longest accepted post-expiry session retention (ten years).
pub const MAX_RETENTION_DAYS: u64 = 3650;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential and token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// First-run administrator seeding.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default` with `config/{env}` and environment variables
    /// prefixed with `YARDSTOCK`, then validates the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("YARDSTOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;

        app.validate()?;
        Ok(app)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }

        let access_minutes = self.auth.access_token_ttl_minutes;
        let refresh_minutes = self.auth.refresh_token_ttl_hours.saturating_mul(60);
        if access_minutes == 0 {
            return Err(AppError::configuration(
                "auth.access_token_ttl_minutes must be greater than zero",
            ));
        }
        if access_minutes > MAX_ACCESS_TOKEN_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_minutes must not exceed {MAX_ACCESS_TOKEN_TTL_MINUTES}"
            )));
        }
        if self.auth.refresh_token_ttl_hours > MAX_REFRESH_TOKEN_TTL_HOURS {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_ttl_hours must not exceed {MAX_REFRESH_TOKEN_TTL_HOURS}"
            )));
        }
        if refresh_minutes <= access_minutes {
            return Err(AppError::configuration(
                "auth.refresh_token_ttl_hours must exceed the access token lifetime",
            ));
        }

        if self.session.retention_days > MAX_RETENTION_DAYS {
            return Err(AppError::configuration(format!(
                "session.retention_days must not exceed {MAX_RETENTION_DAYS}"
            )));
        }

        if self.session.token_bytes < 16 {
            return Err(AppError::configuration(
                "session.token_bytes must be at least 16",
            ));
        }

        Ok(())
    }
}
