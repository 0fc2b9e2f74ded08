//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server
//! (with OpenAPI/Swagger UI). Deployments run the workspace's main `hmw-run`
//! binary instead.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState};
use hmw_core::{db, CoreConfig, SearchRouter, StaffStore};

/// Main entry point for the standalone REST API server.
///
/// # Environment Variables
/// - `PORT`: server port (default: 8080)
/// - `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`/`DB_SSLMODE`:
///   relational store settings
/// - `JWT_SECRET`: token signing secret
/// - `HOSPITAL_A_URL`: partner API endpoint for Hospital A
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration resolution, the database connection or migrations fail, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env()?);

    let pool = db::connect(cfg.db()).await?;
    db::migrate(&pool).await?;

    let state = AppState {
        cfg: Arc::clone(&cfg),
        staff: StaffStore::new(pool.clone()),
        search: Arc::new(SearchRouter::with_default_routes(&cfg, pool)?),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".into());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("-- Starting hospital middleware REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
