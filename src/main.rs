//! Bookcase Server - book catalog
//!
//! Serves the `/api` action endpoint and the client page.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookcase_server::{
    api,
    config::{AppConfig, DatabaseConfig, LoggingConfig},
    repository::Repository,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Bookcase Server v{}", env!("CARGO_PKG_VERSION"));

    let repository = connect(&config.database).await?;

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, repository);
    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookcase_server={},tower_http=debug", logging.level).into());

    let (pretty, json) = match logging.format.as_str() {
        "json" => (None, Some(tracing_subscriber::fmt::layer().json())),
        _ => (Some(tracing_subscriber::fmt::layer()), None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

/// Open the store named by `database.url` and bring its schema up to date
async fn connect(database: &DatabaseConfig) -> anyhow::Result<Repository> {
    if database.url.starts_with("memory:") {
        tracing::warn!("Using in-memory store; data is lost on restart");
        return Ok(Repository::in_memory());
    }

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .connect(&database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    Ok(Repository::new(pool))
}
