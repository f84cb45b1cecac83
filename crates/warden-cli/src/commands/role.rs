//! Role grant commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warden_auth::Authorizer;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_core::types::scope::{GLOBAL_RESOURCE_ID, GLOBAL_RESOURCE_TYPE};
use warden_database::Stores;
use warden_entity::rbac::Role;

use crate::output::{self, OutputFormat};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// User, role name and resource scope of a grant
#[derive(Debug, Args)]
pub struct GrantArgs {
    /// E-mail of the user
    #[arg(short, long)]
    pub user: String,
    /// Role name, e.g. `admin`
    #[arg(short, long)]
    pub name: String,
    /// Resource type; `-` is the global scope
    #[arg(long, default_value = GLOBAL_RESOURCE_TYPE)]
    pub resource_type: String,
    /// Resource id; `0` with type `-` is the global scope
    #[arg(long, default_value_t = GLOBAL_RESOURCE_ID)]
    pub resource_id: i64,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Grant a role for a period starting now
    Allow {
        #[command(flatten)]
        grant: GrantArgs,
        /// Years of validity
        #[arg(long, default_value_t = 0)]
        years: u32,
        /// Months of validity
        #[arg(long, default_value_t = 0)]
        months: u32,
        /// Days of validity
        #[arg(long, default_value_t = 0)]
        days: u32,
    },
    /// Revoke a role
    Deny {
        #[command(flatten)]
        grant: GrantArgs,
    },
    /// Show the roles a user currently holds on a resource
    Authority {
        /// E-mail of the user
        #[arg(short, long)]
        user: String,
        /// Resource type; `-` is the global scope
        #[arg(long, default_value = GLOBAL_RESOURCE_TYPE)]
        resource_type: String,
        /// Resource id
        #[arg(long, default_value_t = GLOBAL_RESOURCE_ID)]
        resource_id: i64,
    },
    /// List all roles
    List,
}

/// Revokes the grant without creating the role. Returns the role when it
/// exists.
async fn revoke(
    stores: &Stores,
    authorizer: &Authorizer,
    grant: &GrantArgs,
) -> Result<Option<Role>, AppError> {
    let user = super::find_user(stores, &grant.user).await?;
    let Some(role) = stores
        .policies
        .find_role(&grant.name, &grant.resource_type, grant.resource_id)
        .await?
    else {
        return Ok(None);
    };
    authorizer.deny(role.id, user.id).await?;
    Ok(Some(role))
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role ID
    id: i64,
    /// Name
    name: String,
    /// Resource type
    resource_type: String,
    /// Resource id
    resource_id: i64,
}

/// Execute role commands
pub async fn execute(
    args: &RoleArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::open_stores(config).await?;
    let authorizer = super::authorizer(&stores);

    match &args.command {
        RoleCommand::Allow {
            grant,
            years,
            months,
            days,
        } => {
            if *years == 0 && *months == 0 && *days == 0 {
                return Err(AppError::validation(
                    "Grant period is empty; pass --years, --months or --days",
                ));
            }
            let user = super::find_user(&stores, &grant.user).await?;
            let role = authorizer
                .get_or_create_role(&grant.name, &grant.resource_type, grant.resource_id)
                .await?;
            let policy = authorizer
                .allow(role.id, user.id, *years, *months, *days)
                .await?;

            output::done(&format!(
                "Granted '{}' on {} to {}",
                role.name,
                role.scope(),
                user.email
            ));
            output::detail("Valid from", output::timestamp(Some(policy.start_at)));
            output::detail("Valid until", output::timestamp(Some(policy.end_at)));
        }
        RoleCommand::Deny { grant } => match revoke(&stores, &authorizer, grant).await? {
            Some(role) => output::done(&format!(
                "Revoked '{}' on {} from {}",
                role.name,
                role.scope(),
                grant.user
            )),
            None => output::note(&format!(
                "Role '{}' on {}/{} does not exist; nothing to revoke",
                grant.name, grant.resource_type, grant.resource_id
            )),
        },
        RoleCommand::Authority {
            user,
            resource_type,
            resource_id,
        } => {
            let user = super::find_user(&stores, user).await?;
            let names = authorizer
                .authority(user.id, resource_type, *resource_id)
                .await;

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&names)?;
                    println!("{json}");
                }
                OutputFormat::Table if names.is_empty() => println!("No roles held."),
                OutputFormat::Table => {
                    for name in names {
                        println!("{name}");
                    }
                }
            }
        }
        RoleCommand::List => {
            let rows: Vec<RoleRow> = stores
                .policies
                .list_roles()
                .await?
                .into_iter()
                .map(|r| RoleRow {
                    id: r.id.get(),
                    name: r.name,
                    resource_type: r.resource_type,
                    resource_id: r.resource_id,
                })
                .collect();

            output::rows(&rows, format, "No roles defined.")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use warden_database::MemoryStore;
    use warden_entity::user::{CreateUser, PROVIDER_EMAIL};

    async fn stores_with_user(email: &str) -> Stores {
        let stores = Stores::memory(MemoryStore::new());
        stores
            .users
            .create(CreateUser {
                uid: Uuid::new_v4(),
                name: "alice".into(),
                email: email.into(),
                password: vec![],
                provider_type: PROVIDER_EMAIL.into(),
                provider_id: email.into(),
                logo: String::new(),
                home: "/users".into(),
            })
            .await
            .unwrap();
        stores
    }

    fn grant(name: &str) -> GrantArgs {
        GrantArgs {
            user: "alice@example.com".into(),
            name: name.into(),
            resource_type: "forum".into(),
            resource_id: 7,
        }
    }

    #[tokio::test]
    async fn test_revoke_unknown_role_creates_nothing() {
        let stores = stores_with_user("alice@example.com").await;
        let authorizer = crate::commands::authorizer(&stores);

        let revoked = revoke(&stores, &authorizer, &grant("editor")).await.unwrap();
        assert!(revoked.is_none());
        assert!(stores.policies.list_roles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revoke_removes_existing_grant() {
        let stores = stores_with_user("alice@example.com").await;
        let authorizer = crate::commands::authorizer(&stores);
        let user = crate::commands::find_user(&stores, "alice@example.com").await.unwrap();
        let role = authorizer.get_or_create_role("editor", "forum", 7).await.unwrap();
        authorizer.allow(role.id, user.id, 0, 0, 5).await.unwrap();

        let revoked = revoke(&stores, &authorizer, &grant("editor")).await.unwrap();
        assert_eq!(revoked.map(|r| r.id), Some(role.id));
        assert!(!authorizer.can(user.id, "editor", "forum", 7).await.unwrap());
    }
}
