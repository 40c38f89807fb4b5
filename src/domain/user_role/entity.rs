use serde::{Deserialize, Serialize};

use crate::domain::role::RoleId;
use crate::domain::user::UserId;

/// One membership fact: the user holds the role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRole {
    user_id: UserId,
    role_id: RoleId,
}

impl UserRole {
    pub fn new(user_id: UserId, role_id: RoleId) -> Self {
        Self { user_id, role_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }
}
