use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::db_key;
use super::resource_key;
use super::resource_read_error;
use super::resource_write_error;
use crate::domain::principal::models::UserId;
use crate::domain::resource::errors::ResourceError;
use crate::domain::resource::models::ResourceId;
use crate::domain::resource::models::SocialMedia;
use crate::domain::resource::models::SocialMediaDraft;
use crate::domain::resource::ports::ResourceRepository;

pub struct PostgresSocialMediaRepository {
    pool: PgPool,
}

impl PostgresSocialMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SocialMediaRow {
    id: i64,
    user_id: i64,
    name: String,
    social_media_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SocialMediaRow> for SocialMedia {
    type Error = ResourceError;

    fn try_from(row: SocialMediaRow) -> Result<Self, Self::Error> {
        Ok(SocialMedia {
            id: ResourceId(resource_key(row.id)?),
            owner: UserId(resource_key(row.user_id)?),
            name: row.name,
            social_media_url: row.social_media_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn not_found(id: ResourceId) -> ResourceError {
    ResourceError::NotFound(format!("social media {}", id))
}

#[async_trait]
impl ResourceRepository for PostgresSocialMediaRepository {
    type Resource = SocialMedia;

    async fn list(&self, limit: i64) -> Result<Vec<SocialMedia>, ResourceError> {
        let rows = sqlx::query_as::<_, SocialMediaRow>(
            r#"
            SELECT id, user_id, name, social_media_url, created_at, updated_at
            FROM social_medias
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(resource_read_error)?;

        rows.into_iter().map(SocialMedia::try_from).collect()
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<SocialMedia>, ResourceError> {
        let Some(key) = db_key(id.0) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, SocialMediaRow>(
            r#"
            SELECT id, user_id, name, social_media_url, created_at, updated_at
            FROM social_medias
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(SocialMedia::try_from).transpose()
    }

    async fn create(&self, draft: SocialMediaDraft) -> Result<SocialMedia, ResourceError> {
        let missing_owner = format!("user {} does not exist", draft.owner);
        let owner =
            db_key(draft.owner.0).ok_or_else(|| ResourceError::Validation(missing_owner.clone()))?;

        let row = sqlx::query_as::<_, SocialMediaRow>(
            r#"
            INSERT INTO social_medias (user_id, name, social_media_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, social_media_url, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.social_media_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| resource_write_error(e, missing_owner))?;

        SocialMedia::try_from(row)
    }

    async fn update(
        &self,
        id: ResourceId,
        draft: SocialMediaDraft,
    ) -> Result<SocialMedia, ResourceError> {
        let key = db_key(id.0).ok_or_else(|| not_found(id))?;

        let row = sqlx::query_as::<_, SocialMediaRow>(
            r#"
            UPDATE social_medias
            SET name = $2, social_media_url = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, name, social_media_url, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(&draft.name)
        .bind(&draft.social_media_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(SocialMedia::try_from)
            .transpose()?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: ResourceId) -> Result<SocialMedia, ResourceError> {
        let key = db_key(id.0).ok_or_else(|| not_found(id))?;

        let row = sqlx::query_as::<_, SocialMediaRow>(
            r#"
            UPDATE social_medias
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, name, social_media_url, created_at, updated_at
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(SocialMedia::try_from)
            .transpose()?
            .ok_or_else(|| not_found(id))
    }
}
