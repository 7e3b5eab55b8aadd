use std::sync::Arc;

use auth::AuthorizationGuard;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth_service::config::Config;
use auth_service::domain::authentication::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::PostgresUserDirectory;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_expiration_minutes = config.jwt.access_expiration_minutes,
        refresh_expiration_days = config.jwt.refresh_expiration_days,
        password = ?config.password,
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

    let lifetimes = config.jwt.lifetimes();
    let token_issuer = Arc::new(TokenIssuer::new(
        config.jwt.access_secret.as_bytes(),
        config.jwt.refresh_secret.as_bytes(),
        lifetimes,
    ));
    let password_hasher = PasswordHasher::with_params(config.password.params())?;
    let user_directory = Arc::new(PostgresUserDirectory::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        user_directory,
        Arc::clone(&token_issuer),
        password_hasher,
    ));
    let guard = Arc::new(AuthorizationGuard::new(token_issuer));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, guard, lifetimes.access.num_seconds());

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
