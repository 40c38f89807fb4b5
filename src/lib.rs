//! Account Store
//!
//! Persistence and credential layer for user accounts:
//! - Users with unique usernames and emails, stored with Argon2id password hashes
//! - Roles identified by unique slugs
//! - Many-to-many role membership through an explicit join table
//! - PostgreSQL and in-memory storage backends

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::DomainError;
use infrastructure::storage::StorageFactory;
use infrastructure::user::{AccountService, Argon2Hasher};

/// Create the account service from configuration
pub async fn create_account_service(config: &AppConfig) -> Result<AccountService, DomainError> {
    let storage = config.storage.to_storage_config()?;
    let repositories = StorageFactory::create(&storage).await?;
    let hasher = Argon2Hasher::from_config(&config.password)?;

    Ok(AccountService::new(repositories, Arc::new(hasher)))
}
