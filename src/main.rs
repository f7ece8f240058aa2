//! Yardstock auth daemon.
//!
//! Wires the in-memory stores into the authentication engine, seeds the
//! bootstrap administrator, and runs the session cleanup sweep until
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use yardstock_auth::{AuthenticationService, NewUser, SessionCleanup};
use yardstock_core::config::AppConfig;
use yardstock_core::error::AppError;
use yardstock_core::types::TenantId;
use yardstock_entity::access::TenantAccess;
use yardstock_entity::user::UserRole;
use yardstock_store::{MemorySessionStore, MemoryUserStore, UserStore};

/// Placeholder secret shipped in the default configuration.
const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("YARDSTOCK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Yardstock auth v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        tracing::warn!("auth.jwt_secret is the shipped placeholder; set YARDSTOCK__AUTH__JWT_SECRET");
    }

    // ── Step 1: Stores ───────────────────────────────────────────
    let users = Arc::new(MemoryUserStore::new());
    let sessions = Arc::new(MemorySessionStore::new());

    // ── Step 2: Authentication service ───────────────────────────
    let auth = AuthenticationService::new(
        &config.auth,
        &config.session,
        users.clone(),
        sessions.clone(),
    )?;
    tracing::info!(
        yard_policy = %config.auth.enterprise_yard_policy,
        "Authentication service initialized"
    );

    // ── Step 3: Bootstrap administrator ──────────────────────────
    seed_admin(&config, &auth, users.as_ref()).await?;

    // ── Step 4: Session cleanup ──────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = SessionCleanup::new(auth.session_manager().clone());
    let interval = Duration::from_secs(config.session.cleanup_interval_minutes.max(1) * 60);
    let cleanup_handle = tokio::spawn(cleanup.run_periodic(interval, shutdown_rx));
    tracing::info!(
        interval_minutes = config.session.cleanup_interval_minutes,
        "Session cleanup scheduled"
    );

    // ── Step 5: Wait for shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
    if let Err(e) = cleanup_handle.await {
        tracing::error!("Session cleanup task failed: {}", e);
    }

    tracing::info!("Yardstock auth stopped");
    Ok(())
}

/// Create the configured system administrator if it does not exist yet.
async fn seed_admin(
    config: &AppConfig,
    auth: &AuthenticationService,
    users: &dyn UserStore,
) -> Result<(), AppError> {
    let bootstrap = &config.bootstrap;
    let (Some(username), Some(password)) = (&bootstrap.admin_username, &bootstrap.admin_password)
    else {
        return Ok(());
    };

    if users.get_user_by_username(username).await?.is_some() {
        tracing::info!(username = %username, "Bootstrap administrator already present");
        return Ok(());
    }

    let email = bootstrap
        .admin_email
        .clone()
        .unwrap_or_else(|| format!("{username}@localhost.localdomain"));
    let tenant = TenantId::new(bootstrap.primary_tenant.clone());

    let admin = auth
        .create_user(NewUser {
            username: username.clone(),
            email,
            password: password.clone(),
            role: UserRole::SystemAdmin,
            is_enterprise_user: true,
            primary_tenant_id: tenant.clone(),
            customer_id: None,
            contact_type: None,
            tenant_access: vec![
                TenantAccess::new(tenant, UserRole::SystemAdmin)
                    .with_capabilities(true, true, true, true),
            ],
        })
        .await?;

    tracing::info!(user_id = %admin.id, "Bootstrap administrator created");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
