//! PostgreSQL membership repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::role::{Role, RoleId};
use crate::domain::user::{User, UserId};
use crate::domain::user_role::{UserRole, UserRoleRepository};
use crate::domain::DomainError;
use crate::infrastructure::role::postgres_repository::row_to_role;
use crate::infrastructure::storage::map_sqlx_error;
use crate::infrastructure::user::postgres_repository::row_to_user;

/// PostgreSQL implementation of UserRoleRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRoleRepository {
    pool: PgPool,
}

impl PostgresUserRoleRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRoleRepository for PostgresUserRoleRepository {
    async fn attach(&self, link: &UserRole) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(link.user_id().value())
        .bind(link.role_id().value())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to attach role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn detach(&self, link: &UserRole) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(link.user_id().value())
            .bind(link.role_id().value())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to detach role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.name, r.slug
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to load roles for user", e))?;

        rows.iter().map(row_to_role).collect()
    }

    async fn users_for_role(&self, role_id: RoleId) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.email, u.password, u.jwt_auth_active, u.date_joined
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.id
            WHERE ur.role_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(role_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to load users for role", e))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn replace_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<(), DomainError> {
        // Dropping the transaction without commit rolls it back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to clear roles", e))?;

        for role_id in role_ids {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, role_id) DO NOTHING
                "#,
            )
            .bind(user_id.value())
            .bind(role_id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to attach role", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit role replacement", e))
    }
}
