//! PostgreSQL role repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::schema::ROLES_SLUG_KEY;
use crate::infrastructure::storage::{map_sqlx_error, unique_violation};

/// PostgreSQL implementation of RoleRepository
#[derive(Debug, Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn save(&self, role: &mut Role) -> Result<(), DomainError> {
        role.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        match role.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO roles (name, slug) VALUES ($1, $2) RETURNING id",
                )
                .bind(role.name())
                .bind(role.slug())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_write_error("Failed to create role", role, e))?;

                role.assign_id(RoleId::new(id));
            }
            Some(id) => {
                let result = sqlx::query("UPDATE roles SET name = $2, slug = $3 WHERE id = $1")
                    .bind(id.value())
                    .bind(role.name())
                    .bind(role.slug())
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_write_error("Failed to update role", role, e))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::not_found(format!("Role '{}' not found", id)));
                }
            }
        }

        Ok(())
    }

    async fn get(&self, id: RoleId) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query("SELECT id, name, slug FROM roles WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get role", e))?;

        row.as_ref().map(row_to_role).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query("SELECT id, name, slug FROM roles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get role by slug", e))?;

        row.as_ref().map(row_to_role).transpose()
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let rows = sqlx::query("SELECT id, name, slug FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to list roles", e))?;

        rows.iter().map(row_to_role).collect()
    }
}

fn map_write_error(context: &str, role: &Role, err: sqlx::Error) -> DomainError {
    match unique_violation(&err) {
        Some(ROLES_SLUG_KEY) => DomainError::constraint_violation(format!(
            "Role slug '{}' already exists",
            role.slug()
        )),
        _ => map_sqlx_error(context, err),
    }
}

pub(crate) fn row_to_role(row: &sqlx::postgres::PgRow) -> Result<Role, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode role row: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let slug: String = row.try_get("slug").map_err(decode)?;

    Ok(Role::from_storage(RoleId::new(id), name, slug))
}
