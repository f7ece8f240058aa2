//! Periodic purge of sessions past their retention window.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::AuthResult;

use super::manager::SessionManager;

/// Drives `cleanup_expired` on a schedule.
///
/// Only rows whose refresh window closed before the retention cutoff are
/// deleted, so the sweep is safe alongside live traffic and idempotent.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    manager: SessionManager,
}

impl SessionCleanup {
    pub fn new(manager: SessionManager) -> Self {
        Self { manager }
    }

    /// Runs one cleanup cycle. Returns the number of sessions deleted.
    pub async fn run_cleanup(&self) -> AuthResult<u64> {
        let deleted = self.manager.cleanup_expired(Utc::now()).await?;
        if deleted > 0 {
            info!(deleted, "Session cleanup completed");
        }
        Ok(deleted)
    }

    /// Run cleanup every `interval` until `shutdown` flips to `true`.
    pub async fn run_periodic(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Session cleanup received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cleanup().await {
                        error!(error = %e, "Session cleanup failed");
                    }
                }
            }
        }
    }
}
