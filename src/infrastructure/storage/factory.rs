//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, RoleRepository, UserRepository, UserRoleRepository};
use crate::infrastructure::role::{InMemoryRoleRepository, PostgresRoleRepository};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};
use crate::infrastructure::user_role::{InMemoryUserRoleRepository, PostgresUserRoleRepository};

use super::postgres::PostgresConfig;

/// Backend selected by the `storage.backend` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Resolved backend settings handed to the factory
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

/// The three repositories of the account store, sharing one backend
#[derive(Debug, Clone)]
pub struct AccountRepositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub user_roles: Arc<dyn UserRoleRepository>,
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the repositories for the configured backend
    pub async fn create(config: &StorageConfig) -> Result<AccountRepositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory account storage");
                Ok(Self::create_in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!(
                    max_connections = pg_config.max_connections,
                    "Connecting account storage to PostgreSQL"
                );
                Self::create_postgres(pg_config).await
            }
        }
    }

    /// Creates in-memory repositories
    pub fn create_in_memory() -> AccountRepositories {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let roles: Arc<dyn RoleRepository> = Arc::new(InMemoryRoleRepository::new());
        let user_roles = Arc::new(InMemoryUserRoleRepository::new(users.clone(), roles.clone()));

        AccountRepositories {
            users,
            roles,
            user_roles,
        }
    }

    /// Creates PostgreSQL repositories sharing one connection pool
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> Result<AccountRepositories, DomainError> {
        let pool = config.connect().await?;

        Ok(AccountRepositories {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
            user_roles: Arc::new(PostgresUserRoleRepository::new(pool)),
        })
    }
}
