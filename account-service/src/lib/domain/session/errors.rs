use thiserror::Error;

use crate::domain::principal::errors::PrincipalError;

/// Error for login and registration flows
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error(transparent)]
    Principal(#[from] PrincipalError),

    /// Unknown username or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    CredentialMismatch,

    #[error("Password hashing failed: {0}")]
    HashError(String),

    #[error("Token signing failed: {0}")]
    SigningError(String),

    #[error("Activity storage failed: {0}")]
    StorageError(String),
}

impl From<auth::JwtError> for SessionError {
    fn from(err: auth::JwtError) -> Self {
        SessionError::SigningError(err.to_string())
    }
}

impl From<auth::PasswordError> for SessionError {
    fn from(err: auth::PasswordError) -> Self {
        SessionError::HashError(err.to_string())
    }
}

impl From<auth::AuthenticationError> for SessionError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => SessionError::CredentialMismatch,
            auth::AuthenticationError::PasswordError(e) => e.into(),
            auth::AuthenticationError::JwtError(e) => e.into(),
        }
    }
}
