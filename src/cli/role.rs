//! `role` subcommands

use clap::Subcommand;
use serde_json::json;

use super::print_json;
use crate::domain::UserId;
use crate::infrastructure::user::AccountService;

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// Create a role
    Create { name: String, slug: String },

    /// List all roles
    List,

    /// Give a role to a user
    Assign { user_id: i64, slug: String },

    /// Take a role away from a user
    Revoke { user_id: i64, slug: String },

    /// Replace all roles of a user
    Set {
        user_id: i64,
        #[arg(num_args = 0..)]
        slugs: Vec<String>,
    },

    /// List the users holding a role
    Members { slug: String },
}

pub async fn run(service: &AccountService, command: RoleCommand) -> anyhow::Result<()> {
    match command {
        RoleCommand::Create { name, slug } => print_json(&service.create_role(&name, &slug).await?),
        RoleCommand::List => print_json(&service.list_roles().await?),
        RoleCommand::Assign { user_id, slug } => {
            let assigned = service.assign_role(UserId::new(user_id), &slug).await?;
            print_json(&json!({ "_id": user_id, "role": slug, "assigned": assigned }))
        }
        RoleCommand::Revoke { user_id, slug } => {
            let revoked = service.revoke_role(UserId::new(user_id), &slug).await?;
            print_json(&json!({ "_id": user_id, "role": slug, "revoked": revoked }))
        }
        RoleCommand::Set { user_id, slugs } => {
            print_json(&service.set_roles(UserId::new(user_id), &slugs).await?)
        }
        RoleCommand::Members { slug } => {
            let users: Vec<_> = service
                .users_with_role(&slug)
                .await?
                .iter()
                .map(|user| user.to_dict(Vec::new()))
                .collect();
            print_json(&users)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn parse(args: &[&str]) -> RoleCommand {
        let cli = Cli::try_parse_from(std::iter::once("account-store").chain(args.iter().copied()))
            .unwrap();

        match cli.command {
            Command::Role(command) => command,
            _ => panic!("Expected role command"),
        }
    }

    #[test]
    fn test_parse_create_and_assign() {
        match parse(&["role", "create", "Admin", "admin"]) {
            RoleCommand::Create { name, slug } => {
                assert_eq!(name, "Admin");
                assert_eq!(slug, "admin");
            }
            other => panic!("Unexpected command: {:?}", other),
        }

        assert!(matches!(
            parse(&["role", "assign", "1", "admin"]),
            RoleCommand::Assign { user_id: 1, .. }
        ));
    }

    #[test]
    fn test_parse_set_accepts_empty_list() {
        match parse(&["role", "set", "4"]) {
            RoleCommand::Set { user_id, slugs } => {
                assert_eq!(user_id, 4);
                assert!(slugs.is_empty());
            }
            other => panic!("Unexpected command: {:?}", other),
        }

        match parse(&["role", "set", "4", "admin", "editor"]) {
            RoleCommand::Set { slugs, .. } => assert_eq!(slugs, vec!["admin", "editor"]),
            other => panic!("Unexpected command: {:?}", other),
        }
    }
}
