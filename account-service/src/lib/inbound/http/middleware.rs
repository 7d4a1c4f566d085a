use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Extension type carrying the verified access token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub principal_id: String,
    pub role: String,
    pub session_id: String,
}

/// Middleware that validates access tokens and adds the principal to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .authenticator
        .validate_access_token(token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            ApiError::Unauthorized("invalid or expired token".to_string())
        })?;

    tracing::debug!(
        principal_id = %claims.user_id,
        session_id = %claims.base.jti,
        "Access token accepted"
    );

    req.extensions_mut().insert(AuthenticatedPrincipal {
        principal_id: claims.user_id,
        role: claims.role,
        session_id: claims.base.jti,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("invalid Authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "invalid Authorization header format, expected: Bearer <token>".to_string(),
            )
        })
}

/// Middleware that tags every request with a correlation id.
///
/// An incoming `X-Correlation-ID` is reused, otherwise a new one is generated.
/// The id is recorded on the request span and echoed on the response.
pub async fn correlation_id(req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", id.as_str());

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}
