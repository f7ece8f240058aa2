//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of random bytes in session ids and refresh tokens.
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Days a session row is kept after its refresh token expires.
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
    /// Interval for the expired session sweep in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_bytes: default_token_bytes(),
            retention_days: default_retention_days(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_token_bytes() -> usize {
    32
}

fn default_retention_days() -> u64 {
    7
}

fn default_cleanup_interval() -> u64 {
    60
}
