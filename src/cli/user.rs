//! `user` subcommands

use clap::{Subcommand, ValueEnum};
use serde_json::json;

use super::print_json;
use crate::domain::UserId;
use crate::infrastructure::user::{AccountService, RegisterUserRequest};

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a new user
    Create {
        username: String,
        email: String,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show a user and their roles by ID
    Show { id: i64 },

    /// Look a user up by username or email
    Find { login: String },

    /// Check a password, upgrading the stored hash if it is outdated
    Verify {
        login: String,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Change a user's email
    SetEmail { id: i64, email: String },

    /// Change a user's username
    SetUsername { id: i64, username: String },

    /// Replace a user's password
    SetPassword {
        id: i64,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Enable or disable token-based auth for a user
    Jwt { id: i64, state: Toggle },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

pub async fn run(service: &AccountService, command: UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::Create {
            username,
            email,
            password,
        } => {
            let user = service
                .register(RegisterUserRequest {
                    username,
                    email,
                    password,
                })
                .await?;
            print_json(&user.to_dict(Vec::new()))
        }
        UserCommand::Show { id } => print_json(&service.user_dict(UserId::new(id)).await?),
        UserCommand::Find { login } => {
            let user = service.find_by_login(&login).await?;

            match user.and_then(|user| user.id()) {
                Some(id) => print_json(&service.user_dict(id).await?),
                None => print_json(&serde_json::Value::Null),
            }
        }
        UserCommand::Verify { login, password } => {
            let user = service.authenticate(&login, &password).await?;
            print_json(&json!({
                "authenticated": user.is_some(),
                "_id": user.and_then(|user| user.id()),
            }))
        }
        UserCommand::SetEmail { id, email } => {
            let user = service.update_email(UserId::new(id), &email).await?;
            print_json(&service.user_dict(user_id(&user)?).await?)
        }
        UserCommand::SetUsername { id, username } => {
            let user = service.update_username(UserId::new(id), &username).await?;
            print_json(&service.user_dict(user_id(&user)?).await?)
        }
        UserCommand::SetPassword { id, password } => {
            service.reset_password(UserId::new(id), &password).await?;
            print_json(&json!({ "_id": id, "password_changed": true }))
        }
        UserCommand::Jwt { id, state } => {
            let user = service
                .set_jwt_auth_active(UserId::new(id), state == Toggle::On)
                .await?;
            print_json(&json!({
                "_id": user.id(),
                "jwt_auth_active": user.is_jwt_auth_active(),
            }))
        }
    }
}

fn user_id(user: &crate::domain::User) -> anyhow::Result<UserId> {
    user.id()
        .ok_or_else(|| anyhow::anyhow!("User '{}' has no id after save", user.username()))
}
