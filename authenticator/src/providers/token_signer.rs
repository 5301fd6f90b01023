//! Bearer credential signing and verification (§6).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AuthenticatorError, Result};

use super::Claims;

/// Abstracts over signing and verifying bearer credentials.
pub trait TokenSigner: Send + Sync {
    /// Sign a set of claims into a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` if signing fails.
    async fn sign(&self, claims: &Claims) -> Result<String>;

    /// Verify a bearer token's signature and expiration and recover its
    /// claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::TokenInvalid` for a bad signature and
    /// `AuthenticatorError::TokenExpired` for an expired-but-valid token.
    async fn verify(&self, token: &str) -> Result<Claims>;
}

/// HS256-backed `TokenSigner` over a shared secret (§6).
#[derive(Clone)]
pub struct JwtTokenSigner {
    secret: String,
}

impl JwtTokenSigner {
    /// Build a signer over the given shared secret.
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl TokenSigner for JwtTokenSigner {
    async fn sign(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthenticatorError::Internal(e.to_string()))
    }

    async fn verify(&self, token: &str) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthenticatorError::TokenExpired,
            _ => AuthenticatorError::TokenInvalid,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_then_verify_round_trips() {
        let signer = JwtTokenSigner::new("test-secret".to_string());
        let claims = Claims { sub: "user@example.com".to_string(), iat: 0, exp: 9_999_999_999, mfa: false };
        let token = signer.sign(&claims).await.unwrap();
        let recovered = signer.verify(&token).await.unwrap();
        assert_eq!(recovered, claims);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let signer = JwtTokenSigner::new("test-secret".to_string());
        let claims = Claims { sub: "user@example.com".to_string(), iat: 0, exp: 1, mfa: false };
        let token = signer.sign(&claims).await.unwrap();
        assert_eq!(signer.verify(&token).await.unwrap_err(), AuthenticatorError::TokenExpired);
    }
}
