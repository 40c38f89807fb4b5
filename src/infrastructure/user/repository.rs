//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    /// Index for username -> user ID lookup
    username_index: HashMap<String, UserId>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, UserId>,
    next_id: i64,
}

impl UserTable {
    fn check_unique(&self, user: &User, own_id: Option<UserId>) -> Result<(), DomainError> {
        if let Some(holder) = self.username_index.get(user.username()) {
            if Some(*holder) != own_id {
                return Err(DomainError::constraint_violation(format!(
                    "Username '{}' already exists",
                    user.username()
                )));
            }
        }

        if let Some(holder) = self.email_index.get(user.email()) {
            if Some(*holder) != own_id {
                return Err(DomainError::constraint_violation(format!(
                    "Email '{}' already exists",
                    user.email()
                )));
            }
        }

        Ok(())
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &mut User) -> Result<(), DomainError> {
        user.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut table = self.table.write().await;

        match user.id() {
            None => {
                table.check_unique(user, None)?;

                table.next_id += 1;
                let id = UserId::new(table.next_id);
                user.assign_id(id);

                table.username_index.insert(user.username().to_string(), id);
                table.email_index.insert(user.email().to_string(), id);
                table.users.insert(id, user.clone());
            }
            Some(id) => {
                let Some(old) = table.users.get(&id) else {
                    return Err(DomainError::not_found(format!("User '{}' not found", id)));
                };

                let old_username = old.username().to_string();
                let old_email = old.email().to_string();

                table.check_unique(user, Some(id))?;

                table.username_index.remove(&old_username);
                table.email_index.remove(&old_email);
                table.username_index.insert(user.username().to_string(), id);
                table.email_index.insert(user.email().to_string(), id);
                table.users.insert(id, user.clone());
            }
        }

        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .username_index
            .get(username)
            .and_then(|id| table.users.get(id))
            .cloned())
    }
}
