//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Consumer name reported in logs. Defaults to `"warden"`.
    #[serde(default = "default_name")]
    pub name: String,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Seconds to wait for in-flight jobs on shutdown.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// Deliveries of a message before a transient failure dead-letters it.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Milliseconds to wait before redelivering a failed message.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_name(),
            concurrency: default_concurrency(),
            shutdown_grace_seconds: default_shutdown_grace(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "warden".to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    1000
}
