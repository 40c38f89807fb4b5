//! Role entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{validate_role_name, validate_role_slug, RoleValidationError};

/// Role identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RoleId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named role that can be attached to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// `None` until the role is first saved
    id: Option<RoleId>,
    /// Display label, not unique
    name: String,
    /// Short unique identifier
    slug: String,
}

impl Role {
    /// Create a new, unsaved role
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            slug: slug.into(),
        }
    }

    /// Rebuild a role loaded from storage
    pub fn from_storage(id: RoleId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            slug: slug.into(),
        }
    }

    // Getters

    pub fn id(&self) -> Option<RoleId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Record the id generated on first insert
    pub fn assign_id(&mut self, id: RoleId) {
        self.id = Some(id);
    }

    /// Check the column constraints of the role
    pub fn validate(&self) -> Result<(), RoleValidationError> {
        validate_role_name(&self.name)?;
        validate_role_slug(&self.slug)
    }
}
