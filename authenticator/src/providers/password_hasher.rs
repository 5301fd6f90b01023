//! Password hashing and constant-time verification.

use crate::error::{AuthenticatorError, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Abstracts over password hashing so the reducer never touches a KDF
/// directly.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` if hashing fails.
    async fn hash(&self, password: &str) -> Result<String>;

    /// Verify a plaintext password against a stored hash in constant time.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` if the stored hash is
    /// malformed.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id-backed `PasswordHasher`.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Construct a hasher using Argon2's recommended default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AuthenticatorError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| AuthenticatorError::Internal(e.to_string()))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash).map_err(|e| AuthenticatorError::Internal(e.to_string()))?;
            Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await
        .map_err(|e| AuthenticatorError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify_round_trips() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("correct horse battery staple").await.unwrap();
        assert!(hasher.verify("correct horse battery staple", &hash).await.unwrap());
        assert!(!hasher.verify("wrong password", &hash).await.unwrap());
    }
}
