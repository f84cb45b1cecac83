//! Policy entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use warden_core::types::{PolicyId, RoleId, UserId};

/// A time-bounded grant of a role to a user.
///
/// At most one policy exists per `(user_id, role_id)`; `start_at <= end_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Policy {
    pub id: PolicyId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Whether the grant is in force at `now`. Both bounds are inclusive.
    pub fn is_enabled_at(&self, now: DateTime<Utc>) -> bool {
        self.start_at <= now && now <= self.end_at
    }
}
