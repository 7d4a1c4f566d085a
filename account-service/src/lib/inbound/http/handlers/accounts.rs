use auth::TokenBundle;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::models::Account;
use crate::domain::principal::models::AccountId;
use crate::domain::principal::models::CreateAccountCommand;
use crate::domain::principal::models::LoginCommand;
use crate::domain::session::errors::SessionError;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateAccountRequest>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let command = CreateAccountCommand::new(body.username, body.password, body.role)?;

    state
        .accounts
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref account| {
            ApiSuccess::new(StatusCode::ACCEPTED, "account created", account.into())
        })
}

pub async fn login_account(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let command = LoginCommand::new(body.username, body.password)?;

    state
        .accounts
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|bundle| ApiSuccess::new(StatusCode::ACCEPTED, "login succeeded", bundle.into()))
}

pub async fn get_account(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let account_id = AccountId::from_string(&principal.principal_id)
        .map_err(|_| ApiError::Unauthorized("token does not identify an account".to_string()))?;

    state
        .accounts
        .get_principal(&account_id)
        .await
        .map_err(|e| match e {
            SessionError::Principal(PrincipalError::NotFound(_)) => {
                ApiError::Unauthorized("account no longer exists".to_string())
            }
            other => ApiError::from(other),
        })
        .map(|ref account| ApiSuccess::new(StatusCode::OK, "account found", account.into()))
}

/// HTTP request body for creating an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
}

/// Credentials shared by account and user login.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub(super) username: String,
    #[serde(default)]
    pub(super) password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: String,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.as_str().to_string(),
            role: account.role.as_str().to_string(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenBundle> for TokenData {
    fn from(bundle: TokenBundle) -> Self {
        Self {
            id_token: bundle.id_token,
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
        }
    }
}
