//! Schema migration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_database::DatabasePool;
use warden_database::connection::redact_url;
use warden_database::migration;

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Run,
    /// Ping the database and list the embedded migrations
    Check,
}

/// Embedded migration row
#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    /// Version
    version: i64,
    /// Description
    description: &'static str,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            migration::apply(pool.pool()).await?;
            output::done("schema is up to date");
        }
        MigrateCommand::Check => {
            let latency = pool.ping().await?;
            output::detail("Database", redact_url(&config.database.url));
            output::detail("Latency", format!("{} ms", latency.as_millis()));

            let rows: Vec<MigrationRow> = migration::embedded()
                .map(|(version, description)| MigrationRow {
                    version,
                    description,
                })
                .collect();
            output::rows(&rows, format, "No migrations embedded.")?;
        }
    }

    pool.close().await;
    Ok(())
}
