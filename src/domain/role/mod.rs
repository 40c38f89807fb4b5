//! Role domain
//!
//! Role records and their repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Role, RoleId};
pub use repository::RoleRepository;
pub use validation::{
    validate_role_name, validate_role_slug, RoleValidationError, MAX_ROLE_NAME_LENGTH,
    MAX_ROLE_SLUG_LENGTH,
};
