pub mod account;
pub mod activity;
pub mod comment;
pub mod photo;
pub mod social_media;
pub mod user;

pub use account::PostgresAccountRepository;
pub use activity::PostgresActivityRepository;
pub use comment::PostgresCommentRepository;
pub use photo::PostgresPhotoRepository;
pub use social_media::PostgresSocialMediaRepository;
pub use user::PostgresUserRepository;

use crate::domain::resource::errors::ResourceError;

/// Storage key for a domain id; ids beyond `i64::MAX` cannot exist in storage.
pub(crate) fn db_key(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

/// Domain id for a storage key; a negative key means corrupt data.
pub(crate) fn from_db_key(key: i64) -> Result<u64, String> {
    u64::try_from(key).map_err(|_| format!("negative key {} in storage", key))
}

pub(crate) fn resource_key(stored: i64) -> Result<u64, ResourceError> {
    from_db_key(stored).map_err(ResourceError::DatabaseError)
}

/// Map an insert/update failure, turning foreign key violations into validation errors.
pub(crate) fn resource_write_error(e: sqlx::Error, missing_reference: String) -> ResourceError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return ResourceError::Validation(missing_reference);
        }
    }
    ResourceError::DatabaseError(e.to_string())
}

pub(crate) fn resource_read_error(e: sqlx::Error) -> ResourceError {
    ResourceError::DatabaseError(e.to_string())
}
