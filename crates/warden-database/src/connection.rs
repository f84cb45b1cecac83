//! PostgreSQL pool for the SQL-backed stores.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use warden_core::config::DatabaseConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;

/// Connection pool shared by the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connects using the pool limits in `config`. A `memory://` URL has
    /// no database behind it and is a configuration error.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            return Err(AppError::configuration(
                "database.url selects the in-memory store; no pool to connect",
            ));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Cannot reach {}", redact_url(&config.url)),
                    e,
                )
            })?;

        info!(
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            "Database pool ready"
        );
        Ok(Self { pool })
    }

    /// The sqlx pool handed to repositories and the migrator.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trips a trivial query and returns its latency.
    pub async fn ping(&self) -> AppResult<Duration> {
        let started = Instant::now();
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Database ping failed", e))?;
        let latency = started.elapsed();
        debug!(latency_ms = latency.as_millis() as u64, "Database ping");
        Ok(latency)
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// `url` with the password of its user-info part replaced by `****`.
pub fn redact_url(url: &str) -> Cow<'_, str> {
    let Some((scheme, rest)) = url.split_once("://") else {
        return Cow::Borrowed(url);
    };
    let Some((user_info, host)) = rest.rsplit_once('@') else {
        return Cow::Borrowed(url);
    };
    match user_info.split_once(':') {
        Some((user, _)) => Cow::Owned(format!("{scheme}://{user}:****@{host}")),
        None => Cow::Borrowed(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_hides_password_only() {
        assert_eq!(
            redact_url("postgres://warden:s3cr3t@db:5432/warden"),
            "postgres://warden:****@db:5432/warden"
        );
        assert_eq!(redact_url("postgres://warden@db/warden"), "postgres://warden@db/warden");
        assert_eq!(redact_url("postgres://db:5432/warden"), "postgres://db:5432/warden");
        assert_eq!(redact_url("memory://"), "memory://");
    }

    #[tokio::test]
    async fn test_connect_rejects_memory_url() {
        let config = DatabaseConfig::default();
        let err = DatabasePool::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
