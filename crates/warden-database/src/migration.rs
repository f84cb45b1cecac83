//! Schema migrations embedded from the workspace `migrations/` directory.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies every embedded migration the database has not seen yet.
pub async fn apply(pool: &PgPool) -> AppResult<()> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(embedded = MIGRATOR.iter().count(), latest, "Applying schema migrations");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema migration failed", e))?;

    info!(version = latest, "Schema is up to date");
    Ok(())
}

/// Version and description of each embedded migration, oldest first.
pub fn embedded() -> impl Iterator<Item = (i64, &'static str)> {
    MIGRATOR.iter().map(|m| (m.version, &*m.description))
}
