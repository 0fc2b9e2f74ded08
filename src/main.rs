//! Main entry point for the hospital middleware.
//!
//! Resolves configuration, connects the relational store, builds the
//! per-hospital search route table and serves the REST API.
//!
//! # Environment Variables
//! - `PORT`: server port (default: 8080)
//! - `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`/`DB_SSLMODE`:
//!   relational store settings
//! - `JWT_SECRET`: token signing secret, also presented to the partner API
//! - `HOSPITAL_A_URL`: partner API endpoint for Hospital A

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState};
use hmw_core::{db, CoreConfig, SearchRouter, StaffStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hmw=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env()?);

    let pool = db::connect(cfg.db()).await?;
    db::migrate(&pool).await?;
    tracing::info!("database connected and migrated");

    let state = AppState {
        cfg: Arc::clone(&cfg),
        staff: StaffStore::new(pool.clone()),
        search: Arc::new(SearchRouter::with_default_routes(&cfg, pool)?),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".into());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("-- Starting hospital middleware on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
