use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::principal::errors::PrincipalError;
use crate::domain::resource::errors::ResourceError;
use crate::domain::session::errors::SessionError;

pub mod accounts;
pub mod resources;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// JSON request body whose rejections are reported as `ApiError::BadRequest`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::InternalServerError(details) => {
                tracing::error!(error = %details, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, Json(ApiErrorBody::new(status, error))).into_response()
    }
}

impl From<PrincipalError> for ApiError {
    fn from(err: PrincipalError) -> Self {
        match err {
            PrincipalError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PrincipalError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            PrincipalError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Principal(e) => ApiError::from(e),
            SessionError::CredentialMismatch => ApiError::Unauthorized(err.to_string()),
            SessionError::HashError(_)
            | SessionError::SigningError(_)
            | SessionError::StorageError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::Validation(msg) => ApiError::BadRequest(msg),
            ResourceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ResourceError::Unauthorized(reason) => ApiError::Forbidden(reason),
            ResourceError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    message: String,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    message: String,
    error: String,
}

impl ApiErrorBody {
    pub fn new(status: StatusCode, error: String) -> Self {
        Self {
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_lowercase(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::principal::errors::AgeError;

    #[test]
    fn test_principal_error_mapping() {
        assert!(matches!(
            ApiError::from(PrincipalError::InvalidAge(AgeError::TooYoung { min: 8, actual: 8 })),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(PrincipalError::UsernameAlreadyExists("bob".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(PrincipalError::NotFound("7".to_string())),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_session_error_mapping() {
        assert!(matches!(
            ApiError::from(SessionError::CredentialMismatch),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(SessionError::StorageError("disk full".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_ownership_reason_is_forwarded() {
        let reason = "record belongs to user 7, not to user 9".to_string();
        assert_eq!(
            ApiError::from(ResourceError::Unauthorized(reason.clone())),
            ApiError::Forbidden(reason)
        );
    }

    #[test]
    fn test_error_body_message() {
        let body = ApiErrorBody::new(StatusCode::FORBIDDEN, "nope".to_string());
        assert_eq!(body.message, "forbidden");
    }
}
