use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::principal::models::UserId;
use crate::domain::resource::errors::ResourceError;

/// A record owned by a user and guarded by the ownership checks.
pub trait OwnedResource: fmt::Debug + Clone + Send + Sync + 'static {
    type Draft: ResourceDraft;

    /// Lowercase resource name used in messages and logs.
    const KIND: &'static str;

    fn id(&self) -> ResourceId;
    fn owner(&self) -> UserId;
}

/// Client-supplied fields for creating or replacing an owned resource.
pub trait ResourceDraft: fmt::Debug + Clone + Send + Sync + 'static {
    /// Owner claimed by the payload.
    fn owner(&self) -> UserId;

    /// Check required fields.
    ///
    /// # Errors
    /// * `Validation` - Lists every missing required field
    fn validate(&self) -> Result<(), ResourceError>;
}

/// Storage-assigned resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl ResourceId {
    /// # Errors
    /// * `Validation` - String is not an unsigned integer
    pub fn from_string(s: &str) -> Result<Self, ResourceError> {
        s.parse::<u64>()
            .map(ResourceId)
            .map_err(|_| ResourceError::Validation(format!("invalid id {:?}", s)))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), ResourceError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ResourceError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: ResourceId,
    pub owner: UserId,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    pub owner: UserId,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
}

impl OwnedResource for Photo {
    type Draft = PhotoDraft;
    const KIND: &'static str = "photo";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }
}

impl ResourceDraft for PhotoDraft {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn validate(&self) -> Result<(), ResourceError> {
        require(&[
            ("title", self.title.as_str()),
            ("photo_url", self.photo_url.as_str()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: ResourceId,
    pub owner: UserId,
    pub photo_id: ResourceId,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub owner: UserId,
    pub photo_id: ResourceId,
    pub message: String,
}

impl OwnedResource for Comment {
    type Draft = CommentDraft;
    const KIND: &'static str = "comment";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }
}

impl ResourceDraft for CommentDraft {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn validate(&self) -> Result<(), ResourceError> {
        require(&[("message", self.message.as_str())])
    }
}

/// A social media profile link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMedia {
    pub id: ResourceId,
    pub owner: UserId,
    pub name: String,
    pub social_media_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMediaDraft {
    pub owner: UserId,
    pub name: String,
    pub social_media_url: String,
}

impl OwnedResource for SocialMedia {
    type Draft = SocialMediaDraft;
    const KIND: &'static str = "social media";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }
}

impl ResourceDraft for SocialMediaDraft {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn validate(&self) -> Result<(), ResourceError> {
        require(&[
            ("name", self.name.as_str()),
            ("social_media_url", self.social_media_url.as_str()),
        ])
    }
}
