use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::resource::service::ResourceService;
use account_service::domain::session::service::SessionService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::PostgresAccountRepository;
use account_service::outbound::repositories::PostgresActivityRepository;
use account_service::outbound::repositories::PostgresCommentRepository;
use account_service::outbound::repositories::PostgresPhotoRepository;
use account_service::outbound::repositories::PostgresSocialMediaRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        issue_timeout_ms = config.jwt.issue_timeout_ms,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_issue_timeout(config.jwt.issue_timeout()),
    );

    let activity_repository = Arc::new(PostgresActivityRepository::new(pg_pool.clone()));
    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));

    let state = AppState {
        accounts: Arc::new(SessionService::new(
            account_repository,
            Arc::clone(&activity_repository),
            Arc::clone(&authenticator),
        )),
        users: Arc::new(SessionService::new(
            user_repository,
            activity_repository,
            Arc::clone(&authenticator),
        )),
        photos: Arc::new(ResourceService::new(Arc::new(PostgresPhotoRepository::new(
            pg_pool.clone(),
        )))),
        comments: Arc::new(ResourceService::new(Arc::new(
            PostgresCommentRepository::new(pg_pool.clone()),
        ))),
        social_medias: Arc::new(ResourceService::new(Arc::new(
            PostgresSocialMediaRepository::new(pg_pool),
        ))),
        authenticator,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    tracing::info!("Server exited");

    Ok(())
}
