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
use crate::domain::resource::models::Photo;
use crate::domain::resource::models::PhotoDraft;
use crate::domain::resource::models::ResourceId;
use crate::domain::resource::ports::ResourceRepository;

pub struct PostgresPhotoRepository {
    pool: PgPool,
}

impl PostgresPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: i64,
    user_id: i64,
    title: String,
    caption: String,
    photo_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PhotoRow> for Photo {
    type Error = ResourceError;

    fn try_from(row: PhotoRow) -> Result<Self, Self::Error> {
        Ok(Photo {
            id: ResourceId(resource_key(row.id)?),
            owner: UserId(resource_key(row.user_id)?),
            title: row.title,
            caption: row.caption,
            photo_url: row.photo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn not_found(id: ResourceId) -> ResourceError {
    ResourceError::NotFound(format!("photo {}", id))
}

#[async_trait]
impl ResourceRepository for PostgresPhotoRepository {
    type Resource = Photo;

    async fn list(&self, limit: i64) -> Result<Vec<Photo>, ResourceError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, user_id, title, caption, photo_url, created_at, updated_at
            FROM photos
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(resource_read_error)?;

        rows.into_iter().map(Photo::try_from).collect()
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Photo>, ResourceError> {
        let Some(key) = db_key(id.0) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, user_id, title, caption, photo_url, created_at, updated_at
            FROM photos
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(Photo::try_from).transpose()
    }

    async fn create(&self, draft: PhotoDraft) -> Result<Photo, ResourceError> {
        let owner = db_key(draft.owner.0)
            .ok_or_else(|| ResourceError::Validation(format!("user {} does not exist", draft.owner)))?;

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            INSERT INTO photos (user_id, title, caption, photo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, caption, photo_url, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(&draft.title)
        .bind(&draft.caption)
        .bind(&draft.photo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| resource_write_error(e, format!("user {} does not exist", draft.owner)))?;

        Photo::try_from(row)
    }

    async fn update(&self, id: ResourceId, draft: PhotoDraft) -> Result<Photo, ResourceError> {
        let key = db_key(id.0).ok_or_else(|| not_found(id))?;

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            UPDATE photos
            SET title = $2, caption = $3, photo_url = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, title, caption, photo_url, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(&draft.title)
        .bind(&draft.caption)
        .bind(&draft.photo_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(Photo::try_from)
            .transpose()?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: ResourceId) -> Result<Photo, ResourceError> {
        let key = db_key(id.0).ok_or_else(|| not_found(id))?;

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            UPDATE photos
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, title, caption, photo_url, created_at, updated_at
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(Photo::try_from)
            .transpose()?
            .ok_or_else(|| not_found(id))
    }
}
