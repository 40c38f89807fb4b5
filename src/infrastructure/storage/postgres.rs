//! PostgreSQL connection pooling and error mapping

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/account_store".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }

    /// Open a connection pool
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| map_sqlx_error("Failed to connect to PostgreSQL", e))
    }
}

/// Translate a sqlx error into the domain taxonomy
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            DomainError::constraint_violation(format!("{}: {}", context, db.message()))
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            DomainError::storage_unavailable(format!("{}: {}", context, err))
        }
        _ => DomainError::storage(format!("{}: {}", context, err)),
    }
}

/// Name of the violated unique constraint, if `err` is a unique violation
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => db.constraint(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/accounts")
            .with_max_connections(20)
            .with_min_connections(2)
            .with_connect_timeout(5)
            .with_idle_timeout(60);

        assert_eq!(config.url, "postgres://db/accounts");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.idle_timeout_secs, 60);
    }

    #[test]
    fn test_unreachable_errors_are_retryable() {
        let err = map_sqlx_error("Failed to get user", sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = map_sqlx_error("Failed to get user", sqlx::Error::Io(io));
        assert!(matches!(err, DomainError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_other_errors_are_storage_errors() {
        let err = map_sqlx_error("Failed to get user", sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(err.to_string().contains("Failed to get user"));
    }

    #[test]
    fn test_unique_violation_on_non_database_error() {
        assert!(unique_violation(&sqlx::Error::PoolClosed).is_none());
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_database() {
        let config = PostgresConfig::new("postgres://nobody@127.0.0.1:1/none")
            .with_min_connections(0)
            .with_connect_timeout(1);

        let err = config.connect().await.unwrap_err();
        assert!(err.is_retryable());
    }
}
