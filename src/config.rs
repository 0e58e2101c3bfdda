//! Environment-driven configuration.
//!
//! The service is configured entirely through environment variables (plus an
//! optional .env file loaded at startup). A full `DATABASE_URL` wins; when it
//! is absent the URL is assembled from the discrete `DB_*` variables the
//! deployment provisions.

use std::env;

use anyhow::Context;

use crate::repository::pool::DEFAULT_POOL_SIZE;

/// Default HTTP port. 3001 avoids colliding with a dev frontend on 3000.
pub const DEFAULT_PORT: u16 = 3001;

/// Row cap applied when the client does not pass `limit`.
pub const DEFAULT_LIMIT: i64 = 100;

/// Hard ceiling on client-supplied limits.
pub const MAX_LIMIT: i64 = 1000;

/// Per-statement deadline in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;

/// Runtime settings for the service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means permissive (development mode).
    pub cors_origins: Vec<String>,
    pub pool_size: usize,
    pub query_timeout_secs: u64,
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => url_from_parts()?,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let pool_size = env::var("DB_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        let query_timeout_secs = env::var("DB_QUERY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);

        Ok(Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            cors_origins,
            pool_size,
            query_timeout_secs,
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        })
    }
}

/// Assemble a database URL from the discrete DB_* variables.
///
/// `DB_DRIVER` selects the backend (`postgres` default, or `mysql`);
/// credentials are percent-encoded so passwords with reserved characters
/// survive the round trip.
fn url_from_parts() -> anyhow::Result<String> {
    let driver = env::var("DB_DRIVER").unwrap_or_else(|_| "postgres".to_string());
    let host = env::var("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
    let user = env::var("DB_USER").context("DB_USER must be set")?;
    let password = env::var("DB_PASSWORD").unwrap_or_default();
    let database = env::var("DB_DATABASE").context("DB_DATABASE must be set")?;

    let default_db_port = if driver == "mysql" { 3306 } else { 5432 };
    let port = env::var("DB_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(default_db_port);

    let user = urlencoding::encode(&user).into_owned();
    let password = urlencoding::encode(&password).into_owned();

    Ok(format!(
        "{driver}://{user}:{password}@{host}:{port}/{database}"
    ))
}

/// Split a comma-separated origin list, dropping empty entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
