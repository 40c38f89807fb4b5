//! In-memory membership repository implementation

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::user_role::{UserRole, UserRoleRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRoleRepository.
///
/// Holds the user and role repositories it links so that foreign keys are
/// enforced the same way the relational schema does.
#[derive(Debug)]
pub struct InMemoryUserRoleRepository {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    /// Kept as (user, role) pairs so range scans by user are ordered
    links: Arc<RwLock<BTreeSet<(UserId, RoleId)>>>,
}

impl InMemoryUserRoleRepository {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self {
            users,
            roles,
            links: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    async fn check_references(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<(), DomainError> {
        if self.users.get(user_id).await?.is_none() {
            return Err(DomainError::constraint_violation(format!(
                "User '{}' does not exist",
                user_id
            )));
        }

        for role_id in role_ids {
            if self.roles.get(*role_id).await?.is_none() {
                return Err(DomainError::constraint_violation(format!(
                    "Role '{}' does not exist",
                    role_id
                )));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl UserRoleRepository for InMemoryUserRoleRepository {
    async fn attach(&self, link: &UserRole) -> Result<bool, DomainError> {
        self.check_references(link.user_id(), &[link.role_id()]).await?;

        let mut links = self.links.write().await;
        Ok(links.insert((link.user_id(), link.role_id())))
    }

    async fn detach(&self, link: &UserRole) -> Result<bool, DomainError> {
        let mut links = self.links.write().await;
        Ok(links.remove(&(link.user_id(), link.role_id())))
    }

    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DomainError> {
        let role_ids: Vec<RoleId> = {
            let links = self.links.read().await;
            links
                .iter()
                .filter(|(u, _)| *u == user_id)
                .map(|(_, r)| *r)
                .collect()
        };

        let mut roles = Vec::with_capacity(role_ids.len());

        for role_id in role_ids {
            if let Some(role) = self.roles.get(role_id).await? {
                roles.push(role);
            }
        }

        Ok(roles)
    }

    async fn users_for_role(&self, role_id: RoleId) -> Result<Vec<User>, DomainError> {
        let user_ids: Vec<UserId> = {
            let links = self.links.read().await;
            links
                .iter()
                .filter(|(_, r)| *r == role_id)
                .map(|(u, _)| *u)
                .collect()
        };

        let mut users = Vec::with_capacity(user_ids.len());

        for user_id in user_ids {
            if let Some(user) = self.users.get(user_id).await? {
                users.push(user);
            }
        }

        Ok(users)
    }

    async fn replace_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<(), DomainError> {
        // Validate everything before touching the set so a failure changes nothing
        self.check_references(user_id, role_ids).await?;

        let mut links = self.links.write().await;
        links.retain(|(u, _)| *u != user_id);

        for role_id in role_ids {
            links.insert((user_id, *role_id));
        }

        Ok(())
    }
}
