use std::sync::Arc;
use std::time::Duration as StdDuration;

use chirp_service::config::Config;
use chirp_service::domain::chirp::service::ChirpService;
use chirp_service::domain::session::service::SessionService;
use chirp_service::domain::session::service::SessionSettings;
use chirp_service::domain::user::service::UserService;
use chirp_service::inbound::http::router::create_router;
use chirp_service::outbound::repositories::PostgresChirpRepository;
use chirp_service::outbound::repositories::PostgresRefreshTokenRepository;
use chirp_service::outbound::repositories::PostgresUserRepository;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirp_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "chirp-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        platform = %config.platform,
        access_ttl_seconds = config.jwt.access_ttl_seconds,
        refresh_ttl_days = config.session.refresh_ttl_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool.clone()));
    let chirp_repository = Arc::new(PostgresChirpRepository::new(pg_pool));

    let settings = SessionSettings {
        access_ttl: Duration::seconds(config.jwt.access_ttl_seconds),
        refresh_ttl: Duration::days(config.session.refresh_ttl_days),
        webhook_key: config.webhook.api_key.clone(),
        persistence_timeout: StdDuration::from_millis(config.session.persistence_timeout_ms),
    };

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        auth::PasswordHasher::new(),
    ));
    let session_service = Arc::new(SessionService::new(
        refresh_token_repository,
        user_repository,
        config.jwt.secret.as_bytes(),
        auth::PasswordHasher::new(),
        settings,
    ));
    let chirp_service = Arc::new(ChirpService::new(chirp_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        session_service,
        chirp_service,
        config.platform,
    );

    axum::serve(http_listener, http_application).await?;

    Ok(())
}
