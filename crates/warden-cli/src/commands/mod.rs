//! CLI command definitions and dispatch.

pub mod migrate;
pub mod role;
pub mod secrets;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use warden_auth::Authorizer;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_core::traits::SystemClock;
use warden_database::Stores;
use warden_entity::user::User;

use crate::output::{self, OutputFormat};

/// Warden: access control and secure tokens
#[derive(Debug, Parser)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Configuration overlay loaded from `config/<env>.toml`
    #[arg(short, long, env = "WARDEN_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Role grants
    Role(role::RoleArgs),
    /// Key material
    Secrets(secrets::SecretsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Secrets(args) => secrets::execute(args),
            Commands::Migrate(args) => {
                migrate::execute(args, &self.load_config()?, self.format).await
            }
            Commands::User(args) => {
                user::execute(args, &self.load_config()?, self.format).await
            }
            Commands::Role(args) => {
                role::execute(args, &self.load_config()?, self.format).await
            }
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.config, &self.env)
    }
}

/// Helper: open the configured stores
pub async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    if config.database.is_memory() {
        output::note("database.url is memory://; changes are discarded on exit");
    }
    Stores::open(&config.database).await
}

/// Helper: an authorizer over the configured stores
pub fn authorizer(stores: &Stores) -> Authorizer {
    Authorizer::new(stores.policies.clone(), Arc::new(SystemClock))
}

/// Helper: look up an e-mail account or fail with `NotFound`
pub async fn find_user(stores: &Stores, email: &str) -> Result<User, AppError> {
    stores
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_allow() {
        let cli = Cli::try_parse_from([
            "warden",
            "role",
            "allow",
            "--user",
            "alice@example.com",
            "--name",
            "editor",
            "--resource-type",
            "forum",
            "--resource-id",
            "7",
            "--years",
            "1",
        ])
        .unwrap();

        match cli.command {
            Commands::Role(role::RoleArgs {
                command: role::RoleCommand::Allow { grant, years, months, days },
            }) => {
                assert_eq!(grant.user, "alice@example.com");
                assert_eq!(grant.name, "editor");
                assert_eq!(grant.resource_type, "forum");
                assert_eq!(grant.resource_id, 7);
                assert_eq!((years, months, days), (1, 0, 0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_role_scope_defaults_to_global() {
        let cli = Cli::try_parse_from([
            "warden", "role", "deny", "--user", "a@example.com", "--name", "admin",
        ])
        .unwrap();

        match cli.command {
            Commands::Role(role::RoleArgs {
                command: role::RoleCommand::Deny { grant },
            }) => {
                assert_eq!(grant.resource_type, "-");
                assert_eq!(grant.resource_id, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_secrets_generate_needs_no_config() {
        let cli = Cli::try_parse_from(["warden", "--format", "json", "secrets", "generate"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Secrets(_)));
    }
}
