//! Relational store bootstrap.
//!
//! The pool is created once at startup and shared by every search invocation;
//! the search path itself never writes.

use crate::config::DbConfig;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Open a connection pool against the configured relational store.
pub async fn connect(cfg: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.connection_string())
        .await
}

/// Apply any pending schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
