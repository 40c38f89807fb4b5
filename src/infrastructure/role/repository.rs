//! In-memory role repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct RoleTable {
    roles: BTreeMap<RoleId, Role>,
    slug_index: HashMap<String, RoleId>,
    next_id: i64,
}

/// In-memory implementation of RoleRepository
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    table: Arc<RwLock<RoleTable>>,
}

impl InMemoryRoleRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn save(&self, role: &mut Role) -> Result<(), DomainError> {
        role.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut table = self.table.write().await;

        if let Some(holder) = table.slug_index.get(role.slug()) {
            if Some(*holder) != role.id() {
                return Err(DomainError::constraint_violation(format!(
                    "Role slug '{}' already exists",
                    role.slug()
                )));
            }
        }

        let id = match role.id() {
            Some(id) => {
                let Some(old) = table.roles.get(&id) else {
                    return Err(DomainError::not_found(format!("Role '{}' not found", id)));
                };
                let old_slug = old.slug().to_string();
                table.slug_index.remove(&old_slug);
                id
            }
            None => {
                table.next_id += 1;
                let id = RoleId::new(table.next_id);
                role.assign_id(id);
                id
            }
        };

        table.slug_index.insert(role.slug().to_string(), id);
        table.roles.insert(id, role.clone());

        Ok(())
    }

    async fn get(&self, id: RoleId) -> Result<Option<Role>, DomainError> {
        let table = self.table.read().await;
        Ok(table.roles.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Role>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .slug_index
            .get(slug)
            .and_then(|id| table.roles.get(id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let table = self.table.read().await;
        Ok(table.roles.values().cloned().collect())
    }
}
