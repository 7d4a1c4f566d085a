use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::accounts::create_account;
use super::handlers::accounts::get_account;
use super::handlers::accounts::login_account;
use super::handlers::resources;
use super::handlers::resources::CommentEndpoint;
use super::handlers::resources::PhotoEndpoint;
use super::handlers::resources::ResourceEndpoint;
use super::handlers::resources::SocialMediaEndpoint;
use super::handlers::users::get_user;
use super::handlers::users::login_user;
use super::handlers::users::register_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::correlation_id;
use crate::domain::principal::models::Account;
use crate::domain::principal::models::User;
use crate::domain::resource::models::Comment;
use crate::domain::resource::models::Photo;
use crate::domain::resource::models::SocialMedia;
use crate::domain::resource::ports::ResourceServicePort;
use crate::domain::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn SessionServicePort<Account>>,
    pub users: Arc<dyn SessionServicePort<User>>,
    pub photos: Arc<dyn ResourceServicePort<Photo>>,
    pub comments: Arc<dyn ResourceServicePort<Comment>>,
    pub social_medias: Arc<dyn ResourceServicePort<SocialMedia>>,
    pub authenticator: Arc<Authenticator>,
}

/// Public and bearer-protected routes for one owned resource kind.
fn resource_routes<E: ResourceEndpoint>(
    state: &AppState,
    base: &str,
) -> (Router<AppState>, Router<AppState>) {
    let public = Router::new()
        .route(&format!("{}/all", base), get(resources::list_all::<E>))
        .route(base, get(resources::get_by_query::<E>));

    let protected = Router::new()
        .route(base, post(resources::create::<E>))
        .route(
            &format!("{}/:id", base),
            put(resources::update::<E>).delete(resources::delete::<E>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    (public, protected)
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/v1/account", post(create_account))
        .route("/v1/account/login", post(login_account))
        .route("/v1/user/register", post(register_user))
        .route("/v1/user/login", post(login_user));

    let protected_routes = Router::new()
        .route("/v1/account", get(get_account))
        .route("/v1/user", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let (photo_public, photo_protected) = resource_routes::<PhotoEndpoint>(&state, "/v1/photo");
    let (comment_public, comment_protected) =
        resource_routes::<CommentEndpoint>(&state, "/v1/comment");
    let (socmed_public, socmed_protected) =
        resource_routes::<SocialMediaEndpoint>(&state, "/v1/socmed");

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                correlation_id = tracing::field::Empty,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(photo_public)
        .merge(photo_protected)
        .merge(comment_public)
        .merge(comment_protected)
        .merge(socmed_public)
        .merge(socmed_protected)
        .layer(middleware::from_fn(correlation_id))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
