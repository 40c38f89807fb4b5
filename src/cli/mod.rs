//! Command-line front end for the account store
//!
//! Subcommands:
//! - `user`: create, inspect and update user accounts
//! - `role`: manage roles and role membership
//! - `schema`: print the PostgreSQL schema the store expects

pub mod role;
pub mod user;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::storage::SCHEMA_SQL;

/// Account Store - users, roles and credentials
#[derive(Parser)]
#[command(name = "account-store")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage user accounts
    #[command(subcommand)]
    User(user::UserCommand),

    /// Manage roles and role membership
    #[command(subcommand)]
    Role(role::RoleCommand),

    /// Print the database schema
    Schema,
}

/// Run a parsed command against the configured store
pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Schema => {
            println!("{}", SCHEMA_SQL.trim());
            Ok(())
        }
        Command::User(command) => {
            let service = crate::create_account_service(config).await?;
            user::run(&service, command).await
        }
        Command::Role(command) => {
            let service = crate::create_account_service(config).await?;
            role::run(&service, command).await
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        let cli = Cli::try_parse_from(["account-store", "schema"]).unwrap();
        assert!(matches!(cli.command, Command::Schema));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["account-store"]).is_err());
        assert!(Cli::try_parse_from(["account-store", "serve"]).is_err());
    }
}
