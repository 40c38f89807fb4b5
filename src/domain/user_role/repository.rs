//! Membership repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::UserRole;
use crate::domain::role::{Role, RoleId};
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for the user/role join table
#[async_trait]
pub trait UserRoleRepository: Send + Sync + Debug {
    /// Attach a role to a user.
    ///
    /// Returns `false` when the membership already existed. Fails with
    /// `ConstraintViolation` when the user or role does not exist.
    async fn attach(&self, link: &UserRole) -> Result<bool, DomainError>;

    /// Detach a role from a user, returning whether the membership existed
    async fn detach(&self, link: &UserRole) -> Result<bool, DomainError>;

    /// Roles held by a user, ordered by role id
    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DomainError>;

    /// Users holding a role, ordered by user id
    async fn users_for_role(&self, role_id: RoleId) -> Result<Vec<User>, DomainError>;

    /// Replace every membership of a user in one atomic step
    async fn replace_roles(&self, user_id: UserId, role_ids: &[RoleId])
        -> Result<(), DomainError>;

    /// Check whether a user holds a role
    async fn has_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool, DomainError> {
        Ok(self
            .roles_for_user(user_id)
            .await?
            .iter()
            .any(|role| role.id() == Some(role_id)))
    }
}
