//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core
//! services. Request handling never reads process-wide environment variables,
//! which keeps behaviour consistent across multi-threaded runtimes and test
//! harnesses.

use crate::{SearchError, SearchResult};
use hmw_types::NonEmptyText;

/// Relational store connection settings.
#[derive(Clone, Debug)]
pub struct DbConfig {
    host: String,
    port: String,
    user: String,
    password: String,
    dbname: String,
    sslmode: String,
}

impl DbConfig {
    /// Read connection settings from the environment, falling back to the
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            host: env_or("DB_HOST", "localhost"),
            port: env_or("DB_PORT", "5432"),
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASSWORD", ""),
            dbname: env_or("DB_NAME", "hospital_middleware"),
            sslmode: env_or("DB_SSLMODE", "disable"),
        }
    }

    /// Render the settings as a `postgres://` connection string.
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.dbname, self.sslmode
        )
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db: DbConfig,
    jwt_secret: NonEmptyText,
    hospital_a_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        db: DbConfig,
        jwt_secret: NonEmptyText,
        hospital_a_url: String,
    ) -> SearchResult<Self> {
        if hospital_a_url.trim().is_empty() {
            return Err(SearchError::InvalidConfig(
                "hospital_a_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            db,
            jwt_secret,
            hospital_a_url,
        })
    }

    /// Resolve the full configuration from the environment.
    ///
    /// # Errors
    /// Fails when `JWT_SECRET` is set to a blank value or the partner endpoint
    /// is unusable.
    pub fn from_env() -> SearchResult<Self> {
        let jwt_secret = NonEmptyText::new(env_or("JWT_SECRET", "hmw-dev-secret"))
            .map_err(|_| SearchError::InvalidConfig("JWT_SECRET cannot be blank".into()))?;
        let hospital_a_url = env_or("HOSPITAL_A_URL", "https://hospital-a.api.co.th");

        Self::new(DbConfig::from_env(), jwt_secret, hospital_a_url)
    }

    pub fn db(&self) -> &DbConfig {
        &self.db
    }

    /// Shared secret used both to sign staff tokens and as the bearer
    /// credential presented to the partner API.
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_str()
    }

    pub fn hospital_a_url(&self) -> &str {
        &self.hospital_a_url
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}
