//! Setting entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored setting. `value` is ciphertext when `encrypted` is set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub id: i64,
    /// Unique key.
    pub key: String,
    #[serde(skip_serializing)]
    pub value: Vec<u8>,
    pub encrypted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
