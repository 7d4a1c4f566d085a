use async_trait::async_trait;

use crate::domain::principal::models::UserId;
use crate::domain::resource::errors::ResourceError;
use crate::domain::resource::models::OwnedResource;
use crate::domain::resource::models::ResourceId;

/// Port for owned resource operations.
///
/// Every mutation is checked against the acting principal before storage is touched.
#[async_trait]
pub trait ResourceServicePort<R: OwnedResource>: Send + Sync + 'static {
    /// Most recent records, newest first.
    async fn list(&self) -> Result<Vec<R>, ResourceError>;

    /// # Errors
    /// * `NotFound` - Record does not exist or was deleted
    async fn get(&self, id: ResourceId) -> Result<R, ResourceError>;

    /// # Errors
    /// * `Unauthorized` - Payload owner is not the acting principal
    /// * `Validation` - Required fields missing
    async fn create(&self, principal: UserId, draft: R::Draft) -> Result<R, ResourceError>;

    /// # Errors
    /// * `NotFound` - Record does not exist or was deleted
    /// * `Unauthorized` - Ownership reassignment, or record owned by someone else
    /// * `Validation` - Required fields missing
    async fn update(
        &self,
        principal: UserId,
        id: ResourceId,
        draft: R::Draft,
    ) -> Result<R, ResourceError>;

    /// Soft-delete a record, returning it as it was.
    ///
    /// # Errors
    /// * `NotFound` - Record does not exist or was deleted
    /// * `Unauthorized` - Record owned by someone else
    async fn delete(&self, principal: UserId, id: ResourceId) -> Result<R, ResourceError>;
}

/// Persistence operations for one owned resource kind.
///
/// Soft-deleted rows are invisible to every operation.
#[async_trait]
pub trait ResourceRepository: Send + Sync + 'static {
    type Resource: OwnedResource;

    /// Retrieve up to `limit` records ordered by creation time, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, limit: i64) -> Result<Vec<Self::Resource>, ResourceError>;

    /// # Returns
    /// Optional record (None if missing or deleted)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Self::Resource>, ResourceError>;

    /// # Returns
    /// Created record with its storage-assigned id
    ///
    /// # Errors
    /// * `Validation` - Referenced record does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create(
        &self,
        draft: <Self::Resource as OwnedResource>::Draft,
    ) -> Result<Self::Resource, ResourceError>;

    /// Replace the mutable fields of a record.
    ///
    /// # Errors
    /// * `NotFound` - No row affected
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        id: ResourceId,
        draft: <Self::Resource as OwnedResource>::Draft,
    ) -> Result<Self::Resource, ResourceError>;

    /// Mark a record deleted.
    ///
    /// # Returns
    /// The record as it was before deletion
    ///
    /// # Errors
    /// * `NotFound` - No row affected
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: ResourceId) -> Result<Self::Resource, ResourceError>;
}
