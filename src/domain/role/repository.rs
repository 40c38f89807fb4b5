//! Role repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Role, RoleId};
use crate::domain::DomainError;

/// Repository trait for role storage
#[async_trait]
pub trait RoleRepository: Send + Sync + Debug {
    /// Insert the role, or update it when it already has an id.
    ///
    /// Assigns the generated id on first insert. A duplicate slug fails with
    /// `ConstraintViolation`.
    async fn save(&self, role: &mut Role) -> Result<(), DomainError>;

    /// Get a role by its ID
    async fn get(&self, id: RoleId) -> Result<Option<Role>, DomainError>;

    /// Get a role by its slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Role>, DomainError>;

    /// List all roles ordered by id
    async fn list(&self) -> Result<Vec<Role>, DomainError>;

    /// Get a role by its ID, failing with `NotFound` on a miss
    async fn get_by_id(&self, id: RoleId) -> Result<Role, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Role '{}' not found", id)))
    }
}
