use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ownership::authorize_create;
use crate::domain::ownership::authorize_delete;
use crate::domain::ownership::authorize_update;
use crate::domain::principal::models::UserId;
use crate::domain::resource::errors::ResourceError;
use crate::domain::resource::models::OwnedResource;
use crate::domain::resource::models::ResourceDraft;
use crate::domain::resource::models::ResourceId;
use crate::domain::resource::ports::ResourceRepository;
use crate::domain::resource::ports::ResourceServicePort;

/// Maximum number of records returned by `list`.
pub const LIST_LIMIT: i64 = 20;

/// Domain service for one owned resource kind.
pub struct ResourceService<RR>
where
    RR: ResourceRepository,
{
    repository: Arc<RR>,
}

impl<RR> ResourceService<RR>
where
    RR: ResourceRepository,
{
    pub fn new(repository: Arc<RR>) -> Self {
        Self { repository }
    }

    async fn existing(&self, id: ResourceId) -> Result<RR::Resource, ResourceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<RR::Resource>(id))
    }
}

fn not_found<R: OwnedResource>(id: ResourceId) -> ResourceError {
    ResourceError::NotFound(format!("{} {}", R::KIND, id))
}

fn rejected<R: OwnedResource>(principal: UserId, err: ResourceError) -> ResourceError {
    tracing::warn!(
        kind = R::KIND,
        principal_id = %principal,
        reason = %err,
        "Ownership check rejected request"
    );
    err
}

#[async_trait]
impl<RR> ResourceServicePort<RR::Resource> for ResourceService<RR>
where
    RR: ResourceRepository,
{
    async fn list(&self) -> Result<Vec<RR::Resource>, ResourceError> {
        self.repository.list(LIST_LIMIT).await
    }

    async fn get(&self, id: ResourceId) -> Result<RR::Resource, ResourceError> {
        self.existing(id).await
    }

    async fn create(
        &self,
        principal: UserId,
        draft: <RR::Resource as OwnedResource>::Draft,
    ) -> Result<RR::Resource, ResourceError> {
        authorize_create(principal, draft.owner())
            .into_result()
            .map_err(|e| rejected::<RR::Resource>(principal, e))?;
        draft.validate()?;

        let created = self.repository.create(draft).await?;

        tracing::info!(
            kind = <RR::Resource as OwnedResource>::KIND,
            resource_id = %created.id(),
            principal_id = %principal,
            "Resource created"
        );

        Ok(created)
    }

    async fn update(
        &self,
        principal: UserId,
        id: ResourceId,
        draft: <RR::Resource as OwnedResource>::Draft,
    ) -> Result<RR::Resource, ResourceError> {
        let existing = self.existing(id).await?;

        authorize_update(principal, draft.owner(), existing.owner())
            .into_result()
            .map_err(|e| rejected::<RR::Resource>(principal, e))?;
        draft.validate()?;

        let updated = self.repository.update(id, draft).await?;

        tracing::info!(
            kind = <RR::Resource as OwnedResource>::KIND,
            resource_id = %id,
            principal_id = %principal,
            "Resource updated"
        );

        Ok(updated)
    }

    async fn delete(
        &self,
        principal: UserId,
        id: ResourceId,
    ) -> Result<RR::Resource, ResourceError> {
        let existing = self.existing(id).await?;

        authorize_delete(existing.owner(), principal)
            .into_result()
            .map_err(|e| rejected::<RR::Resource>(principal, e))?;

        let deleted = self.repository.delete(id).await?;

        tracing::info!(
            kind = <RR::Resource as OwnedResource>::KIND,
            resource_id = %id,
            principal_id = %principal,
            "Resource deleted"
        );

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::resource::models::Photo;
    use crate::domain::resource::models::PhotoDraft;

    mock! {
        pub TestPhotoRepository {}

        #[async_trait]
        impl ResourceRepository for TestPhotoRepository {
            type Resource = Photo;

            async fn list(&self, limit: i64) -> Result<Vec<Photo>, ResourceError>;
            async fn find_by_id(&self, id: ResourceId) -> Result<Option<Photo>, ResourceError>;
            async fn create(&self, draft: PhotoDraft) -> Result<Photo, ResourceError>;
            async fn update(&self, id: ResourceId, draft: PhotoDraft) -> Result<Photo, ResourceError>;
            async fn delete(&self, id: ResourceId) -> Result<Photo, ResourceError>;
        }
    }

    fn photo(id: u64, owner: u64) -> Photo {
        Photo {
            id: ResourceId(id),
            owner: UserId(owner),
            title: "sunset".to_string(),
            caption: "over the bay".to_string(),
            photo_url: "https://img.example.com/sunset.jpg".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn draft(owner: u64) -> PhotoDraft {
        PhotoDraft {
            owner: UserId(owner),
            title: "sunrise".to_string(),
            caption: String::new(),
            photo_url: "https://img.example.com/sunrise.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_uses_limit() {
        let mut repository = MockTestPhotoRepository::new();
        repository
            .expect_list()
            .with(eq(20))
            .times(1)
            .returning(|_| Ok(vec![photo(1, 7)]));

        let service = ResourceService::new(Arc::new(repository));

        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut repository = MockTestPhotoRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = ResourceService::new(Arc::new(repository));

        assert_eq!(
            service.get(ResourceId(5)).await,
            Err(ResourceError::NotFound("photo 5".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_for_self() {
        let mut repository = MockTestPhotoRepository::new();
        repository
            .expect_create()
            .withf(|draft| draft.owner == UserId(7))
            .times(1)
            .returning(|draft| {
                let mut created = photo(1, draft.owner.0);
                created.title = draft.title;
                Ok(created)
            });

        let service = ResourceService::new(Arc::new(repository));

        let created = service.create(UserId(7), draft(7)).await.unwrap();
        assert_eq!(created.owner, UserId(7));
        assert_eq!(created.title, "sunrise");
    }

    #[tokio::test]
    async fn test_create_for_someone_else_never_reaches_storage() {
        let mut repository = MockTestPhotoRepository::new();
        repository.expect_create().times(0);

        let service = ResourceService::new(Arc::new(repository));

        let result = service.create(UserId(7), draft(9)).await;
        assert!(matches!(result, Err(ResourceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_draft() {
        let mut repository = MockTestPhotoRepository::new();
        repository.expect_create().times(0);

        let service = ResourceService::new(Arc::new(repository));

        let mut invalid = draft(7);
        invalid.photo_url = String::new();

        let result = service.create(UserId(7), invalid).await;
        assert!(matches!(result, Err(ResourceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_someone_elses_record() {
        let mut repository = MockTestPhotoRepository::new();
        repository
            .expect_find_by_id()
            .with(eq(ResourceId(1)))
            .returning(|_| Ok(Some(photo(1, 9))));
        repository.expect_update().times(0);

        let service = ResourceService::new(Arc::new(repository));

        let result = service.update(UserId(7), ResourceId(1), draft(7)).await;
        match result {
            Err(ResourceError::Unauthorized(reason)) => {
                assert!(reason.contains("belongs to user 9"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_own_record() {
        let mut repository = MockTestPhotoRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(photo(1, 7))));
        repository
            .expect_update()
            .with(eq(ResourceId(1)), always())
            .times(1)
            .returning(|id, draft| {
                let mut updated = photo(id.0, draft.owner.0);
                updated.title = draft.title;
                Ok(updated)
            });

        let service = ResourceService::new(Arc::new(repository));

        let updated = service.update(UserId(7), ResourceId(1), draft(7)).await.unwrap();
        assert_eq!(updated.title, "sunrise");
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let mut repository = MockTestPhotoRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = ResourceService::new(Arc::new(repository));

        let result = service.update(UserId(7), ResourceId(1), draft(7)).await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner() {
        let mut repository = MockTestPhotoRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(photo(1, 7))));
        repository.expect_delete().times(0);

        let service = ResourceService::new(Arc::new(repository));

        let result = service.delete(UserId(9), ResourceId(1)).await;
        match result {
            Err(ResourceError::Unauthorized(reason)) => {
                assert!(reason.contains('7'));
                assert!(reason.contains('9'));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_by_owner_returns_record() {
        let mut repository = MockTestPhotoRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(photo(1, 7))));
        repository
            .expect_delete()
            .with(eq(ResourceId(1)))
            .times(1)
            .returning(|_| Ok(photo(1, 7)));

        let service = ResourceService::new(Arc::new(repository));

        let deleted = service.delete(UserId(7), ResourceId(1)).await.unwrap();
        assert_eq!(deleted.id, ResourceId(1));
    }
}
