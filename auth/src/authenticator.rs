use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::jwt::claims::AUDIENCE;
use crate::jwt::claims::ISSUER;
use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenBundle;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenType;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and session token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing, concurrent token issuance and token validation.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: Arc<JwtHandler>,
    token_issuer: TokenIssuer,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Tokens are signed with `jwt_secret` and validated against the
    /// service issuer and audience.
    pub fn new(jwt_secret: &[u8]) -> Self {
        let jwt_handler = Arc::new(
            JwtHandler::new(jwt_secret)
                .with_issuer(ISSUER)
                .with_audience(AUDIENCE),
        );

        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(Arc::clone(&jwt_handler)),
            jwt_handler,
        }
    }

    /// Bound the time a login may wait for its token bundle.
    pub fn with_issue_timeout(mut self, timeout: Duration) -> Self {
        self.token_issuer = self.token_issuer.with_deadline(timeout);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against its stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue identity, access and refresh tokens for one session.
    ///
    /// # Errors
    /// * `JwtError` - Any token failed to sign, or issuance timed out
    pub async fn issue_tokens(
        &self,
        principal_id: &str,
        username: &str,
        role: &str,
        session_id: &str,
    ) -> Result<TokenBundle, JwtError> {
        self.token_issuer
            .issue_all(principal_id, username, role, session_id)
            .await
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Validate a token and require it to be an access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is valid but of another type
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let claims: AccessClaims = self.jwt_handler.decode(token)?;

        if claims.base.typ != TokenType::Access {
            return Err(JwtError::InvalidToken(format!(
                "expected {}, got {}",
                TokenType::Access,
                claims.base.typ
            )));
        }

        Ok(claims)
    }
}
