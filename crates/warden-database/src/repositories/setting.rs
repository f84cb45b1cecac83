//! Setting repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::setting::Setting;

use super::write_error;
use crate::store::SettingStore;

/// PostgreSQL-backed [`SettingStore`].
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    /// Create a new setting repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingStore for SettingRepository {
    async fn get(&self, key: &str) -> AppResult<Option<Setting>> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find setting", e))
    }

    async fn put(&self, key: &str, value: Vec<u8>, encrypted: bool) -> AppResult<Setting> {
        sqlx::query_as::<_, Setting>(
            r#"INSERT INTO settings (key, value, encrypted)
               VALUES ($1, $2, $3)
               ON CONFLICT (key)
               DO UPDATE SET value = EXCLUDED.value,
                             encrypted = EXCLUDED.encrypted,
                             updated_at = NOW()
               RETURNING *"#,
        )
        .bind(key)
        .bind(value)
        .bind(encrypted)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to save setting"))
    }
}
