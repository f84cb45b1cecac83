//! Role and policy repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::types::{RoleId, UserId};
use warden_entity::rbac::{Policy, Role};

use super::write_error;
use crate::store::PolicyStore;

/// PostgreSQL-backed [`PolicyStore`].
///
/// Role creation and grant upserts rely on the unique indexes
/// `roles (name, resource_type, resource_id)` and
/// `policies (user_id, role_id)`.
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Create a new policy repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyStore for PolicyRepository {
    async fn find_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE name = $1 AND resource_type = $2 AND resource_id = $3",
        )
        .bind(name)
        .bind(resource_type)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    async fn find_role_by_id(&self, id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role by id", e))
    }

    async fn get_or_create_role(
        &self,
        name: &str,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Role> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Role>(
            r#"INSERT INTO roles (name, resource_type, resource_id)
               VALUES ($1, $2, $3)
               ON CONFLICT (name, resource_type, resource_id)
               DO UPDATE SET name = EXCLUDED.name
               RETURNING *"#,
        )
        .bind(name)
        .bind(resource_type)
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to get or create role"))
    }

    async fn roles_for_resource(
        &self,
        resource_type: &str,
        resource_id: i64,
    ) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE resource_type = $1 AND resource_id = $2 ORDER BY id",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list roles for resource", e)
        })
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    async fn find_policy(&self, user_id: UserId, role_id: RoleId) -> AppResult<Option<Policy>> {
        sqlx::query_as::<_, Policy>("SELECT * FROM policies WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find policy", e))
    }

    async fn upsert_policy(
        &self,
        user_id: UserId,
        role_id: RoleId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> AppResult<Policy> {
        sqlx::query_as::<_, Policy>(
            r#"INSERT INTO policies (user_id, role_id, start_at, end_at)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (user_id, role_id)
               DO UPDATE SET start_at = EXCLUDED.start_at,
                             end_at = EXCLUDED.end_at,
                             updated_at = NOW()
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(role_id)
        .bind(start_at)
        .bind(end_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to upsert policy"))
    }

    async fn delete_policy(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM policies WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete policy", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn policies_for_user(&self, user_id: UserId) -> AppResult<Vec<Policy>> {
        sqlx::query_as::<_, Policy>("SELECT * FROM policies WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list policies for user", e)
            })
    }

    async fn policies_for_role(&self, role_id: RoleId) -> AppResult<Vec<Policy>> {
        sqlx::query_as::<_, Policy>("SELECT * FROM policies WHERE role_id = $1 ORDER BY id")
            .bind(role_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list policies for role", e)
            })
    }
}
