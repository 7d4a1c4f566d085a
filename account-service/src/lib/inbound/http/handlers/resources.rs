use std::sync::Arc;

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::users::authenticated_user;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::principal::models::UserId;
use crate::domain::resource::errors::ResourceError;
use crate::domain::resource::models::Comment;
use crate::domain::resource::models::CommentDraft;
use crate::domain::resource::models::OwnedResource;
use crate::domain::resource::models::Photo;
use crate::domain::resource::models::PhotoDraft;
use crate::domain::resource::models::ResourceId;
use crate::domain::resource::models::SocialMedia;
use crate::domain::resource::models::SocialMediaDraft;
use crate::domain::resource::ports::ResourceServicePort;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

/// Binds one owned resource kind to its HTTP request and response shapes.
pub trait ResourceEndpoint: Send + Sync + 'static {
    type Resource: OwnedResource;
    type Request: DeserializeOwned + Send + 'static;
    type Data: Serialize + PartialEq + From<Self::Resource> + Send + 'static;

    fn service(state: &AppState) -> Arc<dyn ResourceServicePort<Self::Resource>>;

    /// Build a draft from the request body.
    ///
    /// A payload without `user_id` is owned by the acting principal.
    fn into_draft(
        request: Self::Request,
        principal: UserId,
    ) -> Result<<Self::Resource as OwnedResource>::Draft, ResourceError>;
}

pub async fn list_all<E: ResourceEndpoint>(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<E::Data>>, ApiError> {
    let records = E::service(&state).list().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "records found",
        records.into_iter().map(Into::into).collect(),
    ))
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

pub async fn get_by_query<E: ResourceEndpoint>(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<ApiSuccess<E::Data>, ApiError> {
    let raw = query
        .id
        .ok_or_else(|| ApiError::BadRequest("missing required query parameter: id".to_string()))?;
    let id = ResourceId::from_string(&raw)?;

    let record = E::service(&state).get(id).await?;

    Ok(ApiSuccess::new(StatusCode::OK, "record found", record.into()))
}

pub async fn create<E: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    JsonBody(body): JsonBody<E::Request>,
) -> Result<ApiSuccess<E::Data>, ApiError> {
    let acting = authenticated_user(&state, &principal).await?.id;
    let draft = E::into_draft(body, acting)?;

    let record = E::service(&state).create(acting, draft).await?;

    Ok(ApiSuccess::new(StatusCode::ACCEPTED, "record created", record.into()))
}

pub async fn update<E: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<E::Request>,
) -> Result<ApiSuccess<E::Data>, ApiError> {
    let id = ResourceId::from_string(&id)?;
    let acting = authenticated_user(&state, &principal).await?.id;
    let draft = E::into_draft(body, acting)?;

    let record = E::service(&state).update(acting, id, draft).await?;

    Ok(ApiSuccess::new(StatusCode::ACCEPTED, "record updated", record.into()))
}

pub async fn delete<E: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<E::Data>, ApiError> {
    let id = ResourceId::from_string(&id)?;
    let acting = authenticated_user(&state, &principal).await?.id;

    let record = E::service(&state).delete(acting, id).await?;

    Ok(ApiSuccess::new(StatusCode::ACCEPTED, "record deleted", record.into()))
}

pub struct PhotoEndpoint;

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRequest {
    user_id: Option<u64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoData {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Photo> for PhotoData {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id.0,
            user_id: photo.owner.0,
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

impl ResourceEndpoint for PhotoEndpoint {
    type Resource = Photo;
    type Request = PhotoRequest;
    type Data = PhotoData;

    fn service(state: &AppState) -> Arc<dyn ResourceServicePort<Photo>> {
        Arc::clone(&state.photos)
    }

    fn into_draft(request: PhotoRequest, principal: UserId) -> Result<PhotoDraft, ResourceError> {
        Ok(PhotoDraft {
            owner: request.user_id.map(UserId).unwrap_or(principal),
            title: request.title,
            caption: request.caption,
            photo_url: request.photo_url,
        })
    }
}

pub struct CommentEndpoint;

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    user_id: Option<u64>,
    photo_id: Option<u64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentData {
    pub id: u64,
    pub user_id: u64,
    pub photo_id: u64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentData {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.0,
            user_id: comment.owner.0,
            photo_id: comment.photo_id.0,
            message: comment.message,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl ResourceEndpoint for CommentEndpoint {
    type Resource = Comment;
    type Request = CommentRequest;
    type Data = CommentData;

    fn service(state: &AppState) -> Arc<dyn ResourceServicePort<Comment>> {
        Arc::clone(&state.comments)
    }

    fn into_draft(
        request: CommentRequest,
        principal: UserId,
    ) -> Result<CommentDraft, ResourceError> {
        let photo_id = request.photo_id.ok_or_else(|| {
            ResourceError::Validation("missing required fields: photo_id".to_string())
        })?;

        Ok(CommentDraft {
            owner: request.user_id.map(UserId).unwrap_or(principal),
            photo_id: ResourceId(photo_id),
            message: request.message,
        })
    }
}

pub struct SocialMediaEndpoint;

#[derive(Debug, Clone, Deserialize)]
pub struct SocialMediaRequest {
    user_id: Option<u64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    social_media_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialMediaData {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub social_media_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SocialMedia> for SocialMediaData {
    fn from(social_media: SocialMedia) -> Self {
        Self {
            id: social_media.id.0,
            user_id: social_media.owner.0,
            name: social_media.name,
            social_media_url: social_media.social_media_url,
            created_at: social_media.created_at,
            updated_at: social_media.updated_at,
        }
    }
}

impl ResourceEndpoint for SocialMediaEndpoint {
    type Resource = SocialMedia;
    type Request = SocialMediaRequest;
    type Data = SocialMediaData;

    fn service(state: &AppState) -> Arc<dyn ResourceServicePort<SocialMedia>> {
        Arc::clone(&state.social_medias)
    }

    fn into_draft(
        request: SocialMediaRequest,
        principal: UserId,
    ) -> Result<SocialMediaDraft, ResourceError> {
        Ok(SocialMediaDraft {
            owner: request.user_id.map(UserId).unwrap_or(principal),
            name: request.name,
            social_media_url: request.social_media_url,
        })
    }
}
