//! User management commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_entity::user::UserChange;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Mark a user's e-mail address as confirmed
    Confirm {
        /// E-mail of the user
        email: String,
    },
    /// Lock a user out
    Lock {
        /// E-mail of the user
        email: String,
    },
    /// Clear a user's lock
    Unlock {
        /// E-mail of the user
        email: String,
    },
    /// Show a user's latest activity
    Logs {
        /// E-mail of the user
        email: String,
        /// Number of entries
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: i64,
    /// Public UID
    uid: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Confirmed at
    confirmed: String,
    /// Locked at
    locked: String,
    /// Sign-in count
    sign_ins: i64,
    /// Last sign-in
    last_sign_in: String,
}

/// Log display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LogRow {
    /// When
    at: String,
    /// From
    ip: String,
    /// Message
    message: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::open_stores(config).await?;

    match &args.command {
        UserCommand::List => {
            let rows: Vec<UserRow> = stores
                .users
                .list()
                .await?
                .into_iter()
                .map(|u| UserRow {
                    id: u.id.get(),
                    uid: u.uid.to_string(),
                    name: u.name,
                    email: u.email,
                    confirmed: output::timestamp(u.confirmed_at),
                    locked: output::timestamp(u.locked_at),
                    sign_ins: u.sign_in_count,
                    last_sign_in: output::timestamp(u.current_sign_in_at),
                })
                .collect();

            output::rows(&rows, format, "No users.")?;
        }
        UserCommand::Confirm { email } => {
            let user = super::find_user(&stores, email).await?;
            if user.is_confirmed() {
                output::note(&format!("User '{email}' is already confirmed"));
                return Ok(());
            }
            stores
                .users
                .update(user.id, UserChange::Confirmed(Some(Utc::now())))
                .await?;
            output::done(&format!("User '{email}' confirmed"));
        }
        UserCommand::Lock { email } => {
            let user = super::find_user(&stores, email).await?;
            stores
                .users
                .update(user.id, UserChange::Locked(Some(Utc::now())))
                .await?;
            output::done(&format!("User '{email}' locked"));
        }
        UserCommand::Unlock { email } => {
            let user = super::find_user(&stores, email).await?;
            stores
                .users
                .update(user.id, UserChange::Locked(None))
                .await?;
            output::done(&format!("User '{email}' unlocked"));
        }
        UserCommand::Logs { email, limit } => {
            let user = super::find_user(&stores, email).await?;
            let rows: Vec<LogRow> = stores
                .users
                .list_logs(user.id, *limit)
                .await?
                .into_iter()
                .map(|l| LogRow {
                    at: output::timestamp(Some(l.created_at)),
                    ip: l.ip,
                    message: l.message,
                })
                .collect();

            output::rows(&rows, format, "No activity recorded.")?;
        }
    }

    Ok(())
}
