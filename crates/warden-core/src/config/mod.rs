//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod database;
pub mod locale;
pub mod logging;
pub mod secrets;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::locale::LocaleConfig;
pub use self::logging::LoggingConfig;
pub use self::secrets::SecretsConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Prefix of environment variables overriding file configuration,
/// e.g. `WARDEN__DATABASE__URL`.
pub const ENV_PREFIX: &str = "WARDEN";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay + env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Key material for hashing, encryption and token signing.
    #[serde(default)]
    pub secrets: SecretsConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Translation settings.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `path` with the `config/<env>` overlay and environment
    /// variables prefixed with `WARDEN__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            url = "memory://"

            [auth]
            session_ttl_hours = 24
            "#,
        )
        .expect("config should parse");

        assert!(config.database.is_memory());
        assert_eq!(config.auth.session_ttl_hours, 24);
        assert_eq!(config.auth.action_ttl_hours, 6);
        assert_eq!(config.locale.default_lang, "en-US");
        assert_eq!(config.logging.level, "info");
        assert!(config.secrets.hmac.is_empty());
    }

    #[test]
    fn test_secrets_debug_is_redacted() {
        let config = AppConfig::from_toml(
            r#"
            [secrets]
            jwt = "c2VjcmV0LXNpZ25pbmcta2V5"
            "#,
        )
        .expect("config should parse");

        let debug = format!("{:?}", config.secrets);
        assert!(!debug.contains("c2VjcmV0"));
        assert!(debug.contains("<redacted>"));
    }
}
