//! Role field constraints

use thiserror::Error;

/// Errors that can occur during role validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleValidationError {
    #[error("Role name cannot be empty")]
    EmptyName,

    #[error("Role name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Role slug cannot be empty")]
    EmptySlug,

    #[error("Role slug exceeds maximum length of {0} characters")]
    SlugTooLong(usize),
}

pub const MAX_ROLE_NAME_LENGTH: usize = 36;
pub const MAX_ROLE_SLUG_LENGTH: usize = 36;

pub fn validate_role_name(name: &str) -> Result<(), RoleValidationError> {
    if name.is_empty() {
        return Err(RoleValidationError::EmptyName);
    }

    if name.chars().count() > MAX_ROLE_NAME_LENGTH {
        return Err(RoleValidationError::NameTooLong(MAX_ROLE_NAME_LENGTH));
    }

    Ok(())
}

pub fn validate_role_slug(slug: &str) -> Result<(), RoleValidationError> {
    if slug.is_empty() {
        return Err(RoleValidationError::EmptySlug);
    }

    if slug.chars().count() > MAX_ROLE_SLUG_LENGTH {
        return Err(RoleValidationError::SlugTooLong(MAX_ROLE_SLUG_LENGTH));
    }

    Ok(())
}
