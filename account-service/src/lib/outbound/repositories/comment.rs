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
use crate::domain::resource::models::Comment;
use crate::domain::resource::models::CommentDraft;
use crate::domain::resource::models::ResourceId;
use crate::domain::resource::ports::ResourceRepository;

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    user_id: i64,
    photo_id: i64,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = ResourceError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: ResourceId(resource_key(row.id)?),
            owner: UserId(resource_key(row.user_id)?),
            photo_id: ResourceId(resource_key(row.photo_id)?),
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn not_found(id: ResourceId) -> ResourceError {
    ResourceError::NotFound(format!("comment {}", id))
}

fn missing_reference(draft: &CommentDraft) -> String {
    format!(
        "photo {} or user {} does not exist",
        draft.photo_id, draft.owner
    )
}

impl PostgresCommentRepository {
    /// Comments may only reference photos that have not been soft-deleted.
    async fn require_visible_photo(
        &self,
        photo_id: i64,
        draft: &CommentDraft,
    ) -> Result<(), ResourceError> {
        let visible = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM photos WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(photo_id)
        .fetch_one(&self.pool)
        .await
        .map_err(resource_read_error)?;

        if visible {
            Ok(())
        } else {
            Err(ResourceError::Validation(missing_reference(draft)))
        }
    }
}

#[async_trait]
impl ResourceRepository for PostgresCommentRepository {
    type Resource = Comment;

    async fn list(&self, limit: i64) -> Result<Vec<Comment>, ResourceError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, user_id, photo_id, message, created_at, updated_at
            FROM comments
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(resource_read_error)?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Comment>, ResourceError> {
        let Some(key) = db_key(id.0) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, user_id, photo_id, message, created_at, updated_at
            FROM comments
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(Comment::try_from).transpose()
    }

    async fn create(&self, draft: CommentDraft) -> Result<Comment, ResourceError> {
        let (Some(owner), Some(photo_id)) = (db_key(draft.owner.0), db_key(draft.photo_id.0))
        else {
            return Err(ResourceError::Validation(missing_reference(&draft)));
        };
        self.require_visible_photo(photo_id, &draft).await?;

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (user_id, photo_id, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, photo_id, message, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(photo_id)
        .bind(&draft.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| resource_write_error(e, missing_reference(&draft)))?;

        Comment::try_from(row)
    }

    async fn update(&self, id: ResourceId, draft: CommentDraft) -> Result<Comment, ResourceError> {
        let key = db_key(id.0).ok_or_else(|| not_found(id))?;
        let photo_id = db_key(draft.photo_id.0)
            .ok_or_else(|| ResourceError::Validation(missing_reference(&draft)))?;
        self.require_visible_photo(photo_id, &draft).await?;

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET photo_id = $2, message = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, photo_id, message, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(photo_id)
        .bind(&draft.message)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| resource_write_error(e, missing_reference(&draft)))?;

        row.map(Comment::try_from)
            .transpose()?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: ResourceId) -> Result<Comment, ResourceError> {
        let key = db_key(id.0).ok_or_else(|| not_found(id))?;

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, photo_id, message, created_at, updated_at
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(resource_read_error)?;

        row.map(Comment::try_from)
            .transpose()?
            .ok_or_else(|| not_found(id))
    }
}
