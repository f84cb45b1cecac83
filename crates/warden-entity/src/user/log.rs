//! Per-user activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use warden_core::types::UserId;

/// One activity line, e.g. a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserLog {
    pub id: i64,
    pub user_id: UserId,
    /// Client address the action came from.
    pub ip: String,
    /// Localized description of the action.
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Data required to append a log entry.
#[derive(Debug, Clone)]
pub struct CreateUserLog {
    pub user_id: UserId,
    pub ip: String,
    pub message: String,
}
