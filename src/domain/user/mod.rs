//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, credential hashing contract, field
//! constraints and the repository trait.

mod credential;
mod entity;
mod repository;
mod validation;

pub use credential::PasswordHasher;
pub use entity::{User, UserDict, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_username, UserValidationError, MAX_EMAIL_LENGTH, MAX_USERNAME_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
