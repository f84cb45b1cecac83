//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::types::UserId;
use warden_entity::user::{CreateUser, CreateUserLog, PROVIDER_EMAIL, User, UserChange, UserLog};

use super::write_error;
use crate::store::UserStore;

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_uid(&self, uid: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by uid", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE provider_type = $1 AND provider_id = $2",
        )
        .bind(PROVIDER_EMAIL)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by email", e))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users
                (uid, name, email, password, provider_type, provider_id, logo, home)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(data.uid)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.provider_type)
        .bind(&data.provider_id)
        .bind(&data.logo)
        .bind(&data.home)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to create user"))
    }

    async fn update(&self, id: UserId, change: UserChange) -> AppResult<User> {
        let query = match &change {
            UserChange::Password(digest) => sqlx::query_as::<_, User>(
                "UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(digest),
            UserChange::Confirmed(at) => sqlx::query_as::<_, User>(
                "UPDATE users SET confirmed_at = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(*at),
            UserChange::Locked(at) => sqlx::query_as::<_, User>(
                "UPDATE users SET locked_at = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(*at),
            UserChange::Profile { name, logo } => sqlx::query_as::<_, User>(
                "UPDATE users SET name = $2, logo = $3, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(name)
            .bind(logo),
            UserChange::SignIn { ip, at } => sqlx::query_as::<_, User>(
                r#"UPDATE users SET
                    sign_in_count = sign_in_count + 1,
                    last_sign_in_at = current_sign_in_at,
                    last_sign_in_ip = current_sign_in_ip,
                    current_sign_in_at = $2,
                    current_sign_in_ip = $3,
                    updated_at = NOW()
                   WHERE id = $1 RETURNING *"#,
            )
            .bind(id)
            .bind(*at)
            .bind(ip),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    async fn add_log(&self, entry: CreateUserLog) -> AppResult<UserLog> {
        sqlx::query_as::<_, UserLog>(
            "INSERT INTO user_logs (user_id, ip, message) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(entry.user_id)
        .bind(&entry.ip)
        .bind(&entry.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add user log", e))
    }

    async fn list_logs(&self, user_id: UserId, limit: i64) -> AppResult<Vec<UserLog>> {
        sqlx::query_as::<_, UserLog>(
            "SELECT * FROM user_logs WHERE user_id = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user logs", e))
    }
}
