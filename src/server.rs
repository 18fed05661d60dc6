//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring and the Axum server
//! lifecycle.

use crate::application::services::url_validator::DEFAULT_ALLOWED_SCHEMES;
use crate::application::services::{RedirectService, ShortenerService, UrlValidator};
use crate::config::Config;
use crate::infrastructure::persistence::PgRedirectRepository;
use crate::infrastructure::probe::HttpProbe;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - URL probe and services
/// - Axum HTTP server, stopped gracefully on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let state = build_state(pool, &config)?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Opens the connection pool with the configured limits.
async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Wires repositories, probe and services into the shared state.
///
/// # Errors
///
/// Returns an error if the alphabet is invalid or the HTTP client cannot be
/// built.
pub fn build_state(pool: PgPool, config: &Config) -> Result<AppState> {
    let repository = Arc::new(PgRedirectRepository::new(Arc::new(pool)));
    let redirect_service = Arc::new(RedirectService::new(repository));

    let probe = HttpProbe::new(config.probe_max_redirects, config.probe_max_concurrency)?;
    let validator = UrlValidator::new(
        Arc::new(probe),
        DEFAULT_ALLOWED_SCHEMES
            .iter()
            .map(|s| s.to_string())
            .collect(),
        config.probe_timeout(),
    );

    let shortener_service = Arc::new(ShortenerService::new(
        redirect_service.clone(),
        validator,
        config.alphabet()?,
        config.base_url.clone(),
    ));

    Ok(AppState {
        redirect_service,
        shortener_service,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}
