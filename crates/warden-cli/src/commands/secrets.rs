//! Key material commands.

use clap::{Args, Subcommand};

use warden_auth::secrets::generate_config;
use warden_core::error::AppError;

/// Arguments for secrets commands
#[derive(Debug, Args)]
pub struct SecretsArgs {
    /// Secrets subcommand
    #[command(subcommand)]
    pub command: SecretsCommand,
}

/// Secrets subcommands
#[derive(Debug, Subcommand)]
pub enum SecretsCommand {
    /// Print a `[secrets]` section with freshly generated random keys
    Generate,
}

/// Execute secrets commands
pub fn execute(args: &SecretsArgs) -> Result<(), AppError> {
    match &args.command {
        SecretsCommand::Generate => {
            let secrets = generate_config();
            println!("[secrets]");
            println!("jwt = \"{}\"", secrets.jwt);
            println!("aes = \"{}\"", secrets.aes);
            println!("hmac = \"{}\"", secrets.hmac);
        }
    }
    Ok(())
}
