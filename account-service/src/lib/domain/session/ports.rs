use async_trait::async_trait;
use auth::TokenBundle;

use crate::domain::principal::models::LoginCommand;
use crate::domain::principal::models::Principal;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Activity;

/// Port for session operations on one principal kind.
#[async_trait]
pub trait SessionServicePort<P: Principal>: Send + Sync + 'static {
    /// Authenticate and open a session.
    ///
    /// # Returns
    /// Identity, access and refresh tokens sharing the new activity id as `jti`
    ///
    /// # Errors
    /// * `CredentialMismatch` - Unknown username or wrong password
    /// * `StorageError` - Session activity could not be recorded
    /// * `SigningError` - Token issuance failed or timed out
    async fn login(&self, command: LoginCommand) -> Result<TokenBundle, SessionError>;

    /// Create a principal from a validated registration.
    ///
    /// # Errors
    /// * `Principal(UsernameAlreadyExists)` - Username is already taken
    /// * `HashError` - Password hashing failed
    async fn register(&self, registration: P::Registration) -> Result<P, SessionError>;

    /// Retrieve a principal by id.
    ///
    /// # Errors
    /// * `Principal(NotFound)` - Principal does not exist
    async fn get_principal(&self, id: &P::Id) -> Result<P, SessionError>;
}

/// Session activity recorder.
#[async_trait]
pub trait ActivityRepository: Send + Sync + 'static {
    /// Persist an activity row.
    ///
    /// # Returns
    /// The stored activity
    ///
    /// # Errors
    /// * `StorageError` - Insert failed
    async fn create(&self, activity: Activity) -> Result<Activity, SessionError>;
}
