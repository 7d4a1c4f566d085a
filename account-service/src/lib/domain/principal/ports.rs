use async_trait::async_trait;

use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::models::Principal;

/// Persistence operations for one principal kind.
#[async_trait]
pub trait PrincipalRepository: Send + Sync + 'static {
    type Principal: Principal;

    /// Retrieve principal by username.
    ///
    /// # Arguments
    /// * `username` - Username as submitted; may be malformed
    ///
    /// # Returns
    /// Optional principal entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Self::Principal>, PrincipalError>;

    /// Retrieve principal by identifier.
    ///
    /// # Returns
    /// Optional principal entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(
        &self,
        id: &<Self::Principal as Principal>::Id,
    ) -> Result<Option<Self::Principal>, PrincipalError>;

    /// Persist a new principal.
    ///
    /// # Arguments
    /// * `registration` - Validated registration command
    /// * `password_hash` - PHC hash of the registration password
    ///
    /// # Returns
    /// Created principal with its storage-assigned id and timestamps
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(
        &self,
        registration: <Self::Principal as Principal>::Registration,
        password_hash: String,
    ) -> Result<Self::Principal, PrincipalError>;
}
