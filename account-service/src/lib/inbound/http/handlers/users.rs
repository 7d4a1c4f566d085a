use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::accounts::LoginRequest;
use super::accounts::TokenData;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::models::LoginCommand;
use crate::domain::principal::models::RegisterUserCommand;
use crate::domain::principal::models::User;
use crate::domain::principal::models::UserId;
use crate::domain::session::errors::SessionError;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let age = age_text(&body.age);
    let command = RegisterUserCommand::new(body.username, body.email, body.password, age)?;

    state
        .users
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::ACCEPTED, "user registered", user.into()))
}

pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let command = LoginCommand::new(body.username, body.password)?;

    state
        .users
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|bundle| ApiSuccess::new(StatusCode::ACCEPTED, "login succeeded", bundle.into()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user = authenticated_user(&state, &principal).await?;
    Ok(ApiSuccess::new(StatusCode::OK, "user found", (&user).into()))
}

/// Resolve the user behind a verified access token.
///
/// Tokens issued to accounts, and tokens of users that no longer exist, are rejected.
pub(super) async fn authenticated_user(
    state: &AppState,
    principal: &AuthenticatedPrincipal,
) -> Result<User, ApiError> {
    let user_id = UserId::from_string(&principal.principal_id)
        .map_err(|_| ApiError::Unauthorized("token does not identify a user".to_string()))?;

    state
        .users
        .get_principal(&user_id)
        .await
        .map_err(|e| match e {
            SessionError::Principal(PrincipalError::NotFound(_)) => {
                tracing::warn!(
                    principal_id = %user_id,
                    session_id = %principal.session_id,
                    "Token refers to unknown user"
                );
                ApiError::Unauthorized("user no longer exists".to_string())
            }
            other => ApiError::from(other),
        })
}

/// Ages arrive either as JSON numbers or as strings.
fn age_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Clone, PartialEq, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    age: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub age: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            age: user.age.value(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
