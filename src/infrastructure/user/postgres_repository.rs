//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::schema::{USERS_EMAIL_KEY, USERS_USERNAME_KEY};
use crate::infrastructure::storage::{map_sqlx_error, unique_violation};

const USER_COLUMNS: &str = "id, username, email, password, jwt_auth_active, date_joined";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("Failed to get user by {}", column), e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn insert(&self, user: &mut User) -> Result<(), DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password, jwt_auth_active, date_joined)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.is_jwt_auth_active())
        .bind(user.date_joined())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("Failed to create user", user, e))?;

        user.assign_id(UserId::new(id));
        Ok(())
    }

    async fn update(&self, id: UserId, user: &User) -> Result<(), DomainError> {
        // date_joined is never written after the insert
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password = $4, jwt_auth_active = $5
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.is_jwt_auth_active())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("Failed to update user", user, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &mut User) -> Result<(), DomainError> {
        user.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        match user.id() {
            None => self.insert(user).await,
            Some(id) => self.update(id, user).await,
        }
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("username", username).await
    }
}

fn map_write_error(context: &str, user: &User, err: sqlx::Error) -> DomainError {
    match unique_violation(&err) {
        Some(USERS_USERNAME_KEY) => DomainError::constraint_violation(format!(
            "Username '{}' already exists",
            user.username()
        )),
        Some(USERS_EMAIL_KEY) => {
            DomainError::constraint_violation(format!("Email '{}' already exists", user.email()))
        }
        _ => map_sqlx_error(context, err),
    }
}

pub(crate) fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode user row: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let username: String = row.try_get("username").map_err(decode)?;
    let email: String = row.try_get("email").map_err(decode)?;
    let password_hash: Option<String> = row.try_get("password").map_err(decode)?;
    let jwt_auth_active: bool = row.try_get("jwt_auth_active").map_err(decode)?;
    let date_joined: DateTime<Utc> = row.try_get("date_joined").map_err(decode)?;

    Ok(User::from_storage(
        UserId::new(id),
        username,
        email,
        password_hash,
        jwt_auth_active,
        date_joined,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_columns_match_schema() {
        for column in USER_COLUMNS.split(", ") {
            assert!(
                crate::infrastructure::storage::SCHEMA_SQL.contains(column),
                "column {} missing from schema",
                column
            );
        }
    }

    #[test]
    fn test_non_unique_write_errors_pass_through() {
        let user = User::new("alice", "a@x.com");

        let err = map_write_error("Failed to create user", &user, sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
    }
}
