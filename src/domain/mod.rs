//! Domain layer - Core entities, contracts and errors

pub mod error;
pub mod role;
pub mod user;
pub mod user_role;

pub use error::DomainError;
pub use role::{Role, RoleId, RoleRepository};
pub use user::{PasswordHasher, User, UserDict, UserId, UserRepository};
pub use user_role::{UserRole, UserRoleRepository};
