//! First-run administrator seeding.

use serde::{Deserialize, Serialize};

/// Credentials for the system administrator created at startup when the
/// store does not contain it yet. Seeding is skipped unless both a
/// username and a password are configured.
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Login name of the bootstrap administrator.
    #[serde(default)]
    pub admin_username: Option<String>,
    /// Email address of the bootstrap administrator.
    #[serde(default)]
    pub admin_email: Option<String>,
    /// Initial plaintext password (hashed before it is stored).
    #[serde(default)]
    pub admin_password: Option<String>,
    /// Primary tenant of the bootstrap administrator.
    #[serde(default = "default_primary_tenant")]
    pub primary_tenant: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_username: None,
            admin_email: None,
            admin_password: None,
            primary_tenant: default_primary_tenant(),
        }
    }
}

impl BootstrapConfig {
    /// Whether enough is configured to seed an administrator.
    pub fn is_enabled(&self) -> bool {
        self.admin_username.is_some() && self.admin_password.is_some()
    }
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_username", &self.admin_username)
            .field("admin_email", &self.admin_email)
            .field("primary_tenant", &self.primary_tenant)
            .finish_non_exhaustive()
    }
}

fn default_primary_tenant() -> String {
    "default".to_string()
}
