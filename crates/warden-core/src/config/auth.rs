//! Authentication configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Token lifetimes and password policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token TTL in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Action (confirm / unlock / reset-password) token TTL in hours.
    #[serde(default = "default_action_ttl")]
    pub action_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Minimum zxcvbn score (0-4) a new password must reach. 0 disables the check.
    #[serde(default)]
    pub password_min_strength: u8,
}

impl AuthConfig {
    /// Session token lifetime.
    pub fn session_ttl(&self) -> Duration {
        hours(self.session_ttl_hours)
    }

    /// Action token lifetime.
    pub fn action_ttl(&self) -> Duration {
        hours(self.action_ttl_hours)
    }
}

fn hours(value: u64) -> Duration {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX)
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
            action_ttl_hours: default_action_ttl(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            password_min_strength: 0,
        }
    }
}

fn default_session_ttl() -> u64 {
    24 * 7
}

fn default_action_ttl() -> u64 {
    6
}

fn default_password_min() -> usize {
    6
}

fn default_password_max() -> usize {
    32
}
