//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::{error, warn};

use crate::error::{AuthError, AuthResult};

/// Plaintext hashed once to give unknown-user logins a real hash to verify against.
const DUMMY_PASSWORD: &str = "yardstock-dummy-password";

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        if password.is_empty() {
            return Err(AuthError::Validation("Password must not be empty".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Crypto(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// A malformed stored hash is indistinguishable from a wrong password
    /// to the caller.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                warn!(error = %e, "Password verification failed");
                false
            }
        }
    }

    /// Hash on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> AuthResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AuthError::Crypto(format!("Hashing task failed: {e}")))?
    }

    /// Verify on the blocking thread pool.
    pub async fn verify_blocking(&self, password: String, hash: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!(error = %e, "Verification task failed");
                false
            }
        }
    }

    /// Burn the same work as a real verification when no user matched.
    ///
    /// The dummy hash is built lazily on the blocking pool, like the verify.
    pub async fn verify_dummy(&self, password: String) {
        let hasher = self.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            if let Some(hash) = dummy_hash() {
                hasher.verify_password(&password, hash);
            }
        })
        .await;
        if let Err(e) = outcome {
            error!(error = %e, "Dummy verification task failed");
        }
    }
}

/// Argon2 hash of [`DUMMY_PASSWORD`], computed on first use.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| PasswordHasher.hash_password(DUMMY_PASSWORD).ok())
        .as_deref()
}
